use crate::{
    async_trait,
    schema::{EntityRef, FieldRef},
    RowId,
};

use std::{collections::HashMap, fmt, fmt::Debug, sync::Arc};

/// Row id → display label.
pub type Entries = HashMap<RowId, String>;

/// Scope in which a referenced row is looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntriesRef {
    /// Every row of an entity.
    Entity(EntityRef),

    /// Rows of `entity` allowed as values of the referencing field.
    Domain {
        entity: EntityRef,
        referenced_by: FieldRef,
    },
}

/// Labels already known to a cache.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CachedEntries {
    pub entries: Entries,

    /// When set, an id absent from `entries` has no label at all.
    pub complete: bool,
}

/// Shared store of display labels for referenced rows.
#[async_trait]
pub trait LabelCache: Debug + Send + Sync + 'static {
    /// Labels currently held for `scope`, without doing any I/O.
    fn get_entries(&self, scope: &EntriesRef) -> Option<Arc<CachedEntries>>;

    /// Look up labels for `ids`. Ids without a label are left out of the result.
    async fn resolve_labels(&self, scope: &EntriesRef, ids: &[RowId]) -> crate::Result<Entries>;
}

impl EntriesRef {
    pub fn entity(&self) -> &EntityRef {
        match self {
            Self::Entity(entity) => entity,
            Self::Domain { entity, .. } => entity,
        }
    }
}

impl fmt::Display for EntriesRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(entity) => write!(f, "{entity}"),
            Self::Domain {
                entity,
                referenced_by,
            } => write!(f, "{entity} (via {referenced_by})"),
        }
    }
}

impl CachedEntries {
    pub fn new(entries: Entries, complete: bool) -> Self {
        Self { entries, complete }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_display() {
        let items = EntityRef::new("public", "items");
        let orders = EntityRef::new("public", "orders");

        assert_eq!(EntriesRef::Entity(items.clone()).to_string(), "public.items");
        assert_eq!(
            EntriesRef::Domain {
                entity: items,
                referenced_by: orders.field("item"),
            }
            .to_string(),
            "public.items (via public.orders.item)"
        );
    }
}
