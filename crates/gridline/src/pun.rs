//! Display labels ("puns") for reference values.
//!
//! Labels found in a [`LabelCache`] are applied while the value is built.
//! Everything else is queued and looked up when the owner of the view calls
//! [`CombinedView::resolve_labels`](crate::CombinedView::resolve_labels).

use crate::{
    view::{CombinedValue, ValueKey},
    CombinedView, ValueUpdate, ViewHandler,
};

use gridline_core::{
    provider::{Entries, EntriesRef, LabelCache},
    refs::{RowRef, ValueRef},
    schema::{EntityRef, FieldType},
    RowId, Value,
};
use std::{collections::HashMap, sync::Arc};
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

/// Label state of a punned value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pun {
    /// A lookup is in flight.
    Unresolved,

    /// There is no label for the value.
    Missing,

    Label(String),
}

impl Pun {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Label(label) => Some(label),
            _ => None,
        }
    }
}

/// Per-view label state: labels seen so far and lookups still to run.
#[derive(Debug)]
pub(crate) struct PunResolver {
    labels: Arc<dyn LabelCache>,

    /// Entries collected by this view and its predecessors, by referenced
    /// entity. Used when a lookup fails.
    local: HashMap<EntityRef, Entries>,

    pending: Vec<PendingPun>,
}

#[derive(Debug)]
struct PendingPun {
    target: ValueRef,
    key: ValueKey,
    scope: EntriesRef,
    id: RowId,
}

/// A finished lookup, ready to be written into its value.
#[derive(Debug)]
pub(crate) struct ResolvedPun {
    pub(crate) target: ValueRef,
    pub(crate) key: ValueKey,
    pub(crate) pun: Pun,
}

impl PunResolver {
    pub(crate) fn new(labels: Arc<dyn LabelCache>) -> Self {
        Self {
            labels,
            local: HashMap::new(),
            pending: vec![],
        }
    }

    /// Starts from the entries collected by a previous view.
    pub(crate) fn inherit(mut self, old: PunResolver) -> Self {
        self.local = old.local;
        self
    }

    pub(crate) fn labels(&self) -> &Arc<dyn LabelCache> {
        &self.labels
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Sets the pun of `value` for a field of type `field_type`, queueing a
    /// lookup when no cached label is available. Non-reference fields are
    /// left alone.
    pub(crate) fn request<V>(
        &mut self,
        target: ValueRef,
        value: &mut CombinedValue<V>,
        field_type: &FieldType,
    ) {
        let Some(entity) = field_type.referenced_entity() else {
            return;
        };

        let Some(id) = referenced_id(value) else {
            value.pun = Some(Pun::Missing);
            return;
        };

        let scope = match &value.info {
            Some(info) => EntriesRef::Domain {
                entity: entity.clone(),
                referenced_by: info.field_ref.clone(),
            },
            None => EntriesRef::Entity(entity.clone()),
        };

        if let Some(cached) = self.labels.get_entries(&scope) {
            if let Some(label) = cached.entries.get(&id) {
                value.pun = Some(Pun::Label(label.clone()));
                self.remember(entity, &cached.entries);
                return;
            }
            if cached.complete {
                value.pun = Some(Pun::Missing);
                return;
            }
        }

        value.pun = Some(Pun::Unresolved);
        self.pending.push(PendingPun {
            target,
            key: value.key,
            scope,
            id,
        });
    }

    /// Runs every queued lookup, one request per scope, concurrently.
    ///
    /// Lookup failures are not errors: the value falls back to a label
    /// collected earlier, or to [`Pun::Missing`].
    pub(crate) async fn resolve(&mut self) -> Vec<ResolvedPun> {
        let pending = std::mem::take(&mut self.pending);
        if pending.is_empty() {
            return vec![];
        }

        let mut requests: HashMap<EntriesRef, Vec<RowId>> = HashMap::new();
        for p in &pending {
            let ids = requests.entry(p.scope.clone()).or_default();
            if !ids.contains(&p.id) {
                ids.push(p.id);
            }
        }

        let mut lookups = JoinSet::new();
        for (scope, ids) in requests {
            let labels = self.labels.clone();
            lookups.spawn(async move {
                let res = labels.resolve_labels(&scope, &ids).await;
                (scope, res)
            });
        }

        let mut resolved: HashMap<EntriesRef, Entries> = HashMap::new();
        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok((scope, Ok(entries))) => {
                    self.remember(scope.entity(), &entries);
                    resolved.insert(scope, entries);
                }
                Ok((scope, Err(err))) => {
                    debug!(%scope, error = %err, "label lookup failed; using cached labels");
                }
                Err(err) => {
                    warn!(error = %err, "label lookup task did not complete");
                }
            }
        }

        pending
            .into_iter()
            .map(|p| {
                let label = match resolved.get(&p.scope) {
                    Some(entries) => entries.get(&p.id),
                    None => self
                        .local
                        .get(p.scope.entity())
                        .and_then(|entries| entries.get(&p.id)),
                };
                let pun = match label {
                    Some(label) => Pun::Label(label.clone()),
                    None => Pun::Missing,
                };
                ResolvedPun {
                    target: p.target,
                    key: p.key,
                    pun,
                }
            })
            .collect()
    }

    fn remember(&mut self, entity: &EntityRef, entries: &Entries) {
        let local = self.local.entry(entity.clone()).or_default();
        local.extend(entries.iter().map(|(id, label)| (*id, label.clone())));
    }
}

/// The id a reference value points at. Typed text takes precedence over the
/// validated value, as that is what the cell shows.
fn referenced_id<V>(value: &CombinedValue<V>) -> Option<RowId> {
    let typed = value.raw_value.as_ref().and_then(|raw| match raw {
        Value::Int(id) => Some(*id),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    });
    typed
        .or_else(|| value.value.as_ref().and_then(Value::as_int))
        .map(RowId)
}

impl ResolvedPun {
    /// Writes the label into `value` unless the value was replaced since the
    /// lookup was queued.
    pub(crate) fn apply<V>(&self, value: &mut CombinedValue<V>) -> bool {
        if value.key != self.key {
            trace!(target_ref = ?self.target, "dropping label for a replaced value");
            return false;
        }
        value.pun = Some(self.pun.clone());
        true
    }
}

impl<H: ViewHandler> CombinedView<H> {
    /// Runs the queued label lookups and writes their results, notifying the
    /// handler with [`ValueUpdate::Pun`] for each value that changed.
    ///
    /// Values replaced while their lookup was in flight are left alone.
    /// Returns the number of values updated.
    pub async fn resolve_labels(&mut self) -> usize {
        let resolved = self.puns.resolve().await;

        let Self {
            handler,
            cx,
            extra,
            rows,
            added,
            empty_row,
            ..
        } = self;

        let mut applied = 0;
        for pun in resolved {
            let column = pun.target.column;
            match pun.target.row {
                RowRef::Existing(position) => {
                    let Some(row) = rows.as_mut().and_then(|rows| rows.get_mut(position)) else {
                        continue;
                    };
                    if !row.values.get_mut(column).is_some_and(|value| pun.apply(value)) {
                        continue;
                    }
                    handler.update_value(cx, extra, position, row, column, &ValueUpdate::Pun);
                }
                RowRef::Added(id) => {
                    let Some(row) = added.get_mut(&id) else {
                        continue;
                    };
                    if !row.values.get_mut(column).is_some_and(|value| pun.apply(value)) {
                        continue;
                    }
                    handler.update_added_value(cx, extra, id, row, column, &ValueUpdate::Pun);
                }
                RowRef::New => {
                    let Some(row) = empty_row.as_mut() else {
                        continue;
                    };
                    if !row.values.get_mut(column).is_some_and(|value| pun.apply(value)) {
                        continue;
                    }
                    handler.update_empty_value(cx, extra, row, column, &ValueUpdate::Pun);
                }
            }
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridline_core::{
        async_trait,
        provider::CachedEntries,
        refs::RowRef,
        Error,
    };
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Labels {
        cached: Option<CachedEntries>,
        remote: Entries,
        fail: bool,
        calls: Mutex<Vec<Vec<RowId>>>,
    }

    #[async_trait]
    impl LabelCache for Labels {
        fn get_entries(&self, _scope: &EntriesRef) -> Option<Arc<CachedEntries>> {
            self.cached.clone().map(Arc::new)
        }

        async fn resolve_labels(
            &self,
            _scope: &EntriesRef,
            ids: &[RowId],
        ) -> gridline_core::Result<Entries> {
            self.calls.lock().unwrap().push(ids.to_vec());
            if self.fail {
                return Err(Error::lookup(std::io::Error::other("timeout")));
            }
            Ok(ids
                .iter()
                .filter_map(|id| Some((*id, self.remote.get(id)?.clone())))
                .collect())
        }
    }

    fn items() -> FieldType {
        FieldType::reference(EntityRef::new("public", "items"))
    }

    fn target(column: usize) -> ValueRef {
        ValueRef::new(RowRef::Existing(0), column)
    }

    #[test]
    fn null_references_have_no_label() {
        let mut resolver = PunResolver::new(Arc::new(Labels::default()));
        let mut value = CombinedValue::unbound(Some(Value::Null));

        resolver.request(target(0), &mut value, &items());

        assert_eq!(value.pun, Some(Pun::Missing));
        assert!(!resolver.has_pending());
    }

    #[test]
    fn non_references_are_not_punned() {
        let mut resolver = PunResolver::new(Arc::new(Labels::default()));
        let mut value = CombinedValue::unbound(Some(Value::from(3)));

        resolver.request(target(0), &mut value, &FieldType::Int);

        assert_eq!(value.pun, None);
    }

    #[test]
    fn cached_labels_apply_immediately() {
        let labels = Labels {
            cached: Some(CachedEntries::new(
                [(RowId(42), "Item 42".to_string())].into(),
                false,
            )),
            ..Labels::default()
        };
        let mut resolver = PunResolver::new(Arc::new(labels));

        let mut hit = CombinedValue::unbound(Some(Value::from(42)));
        resolver.request(target(0), &mut hit, &items());
        assert_eq!(hit.pun, Some(Pun::Label("Item 42".into())));

        let mut miss = CombinedValue::unbound(Some(Value::from(43)));
        resolver.request(target(1), &mut miss, &items());
        assert_eq!(miss.pun, Some(Pun::Unresolved));
        assert!(resolver.has_pending());
    }

    #[test]
    fn complete_caches_answer_misses() {
        let labels = Labels {
            cached: Some(CachedEntries::new(Entries::new(), true)),
            ..Labels::default()
        };
        let mut resolver = PunResolver::new(Arc::new(labels));
        let mut value = CombinedValue::unbound(Some(Value::from(42)));

        resolver.request(target(0), &mut value, &items());

        assert_eq!(value.pun, Some(Pun::Missing));
        assert!(!resolver.has_pending());
    }

    #[tokio::test]
    async fn lookups_are_deduplicated() {
        let labels = Arc::new(Labels {
            remote: [(RowId(42), "Item 42".to_string())].into(),
            ..Labels::default()
        });
        let mut resolver = PunResolver::new(labels.clone());

        let mut a = CombinedValue::unbound(Some(Value::from(42)));
        let mut b = CombinedValue::unbound(Some(Value::from(42)));
        let mut c = CombinedValue::unbound(Some(Value::from(7)));
        resolver.request(target(0), &mut a, &items());
        resolver.request(target(1), &mut b, &items());
        resolver.request(target(2), &mut c, &items());

        let resolved = resolver.resolve().await;

        assert_eq!(*labels.calls.lock().unwrap(), vec![vec![RowId(42), RowId(7)]]);
        assert!(resolved[0].apply(&mut a));
        assert!(resolved[1].apply(&mut b));
        assert!(resolved[2].apply(&mut c));
        assert_eq!(a.pun, Some(Pun::Label("Item 42".into())));
        assert_eq!(b.pun, Some(Pun::Label("Item 42".into())));
        assert_eq!(c.pun, Some(Pun::Missing));
    }

    #[tokio::test]
    async fn failures_fall_back_to_collected_labels() {
        let ok = Arc::new(Labels {
            remote: [(RowId(42), "Item 42".to_string())].into(),
            ..Labels::default()
        });
        let mut old = PunResolver::new(ok);
        let mut value = CombinedValue::unbound(Some(Value::from(42)));
        old.request(target(0), &mut value, &items());
        old.resolve().await;

        let failing = Arc::new(Labels {
            fail: true,
            ..Labels::default()
        });
        let mut resolver = PunResolver::new(failing).inherit(old);

        let mut known = CombinedValue::unbound(Some(Value::from(42)));
        let mut unknown = CombinedValue::unbound(Some(Value::from(9)));
        resolver.request(target(0), &mut known, &items());
        resolver.request(target(1), &mut unknown, &items());

        for resolved in resolver.resolve().await {
            let value = if resolved.target == target(0) {
                &mut known
            } else {
                &mut unknown
            };
            resolved.apply(value);
        }

        assert_eq!(known.pun, Some(Pun::Label("Item 42".into())));
        assert_eq!(unknown.pun, Some(Pun::Missing));
    }

    #[tokio::test]
    async fn stale_resolutions_are_dropped() {
        let labels = Arc::new(Labels {
            remote: [(RowId(42), "Item 42".to_string())].into(),
            ..Labels::default()
        });
        let mut resolver = PunResolver::new(labels);
        let mut value = CombinedValue::unbound(Some(Value::from(42)));
        resolver.request(target(0), &mut value, &items());

        value.key = ValueKey::next();

        let resolved = resolver.resolve().await;
        assert!(!resolved[0].apply(&mut value));
        assert_eq!(value.pun, Some(Pun::Unresolved));
    }
}
