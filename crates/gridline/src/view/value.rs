use crate::Pun;

use gridline_core::{
    schema::{AttributesMap, ColumnField, FieldRef},
    staging::UpdatedValue,
    RowId, Value,
};

use std::sync::atomic::{AtomicU64, Ordering};

/// A reconciled cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedValue<V = ()> {
    /// Last successfully validated value; `None` when the current input is
    /// invalid.
    pub value: Option<Value>,

    /// Unparsed user input. Takes precedence over `value` for display and
    /// editing.
    pub raw_value: Option<Value>,

    /// State right after reconciliation (or commit), restored by resets.
    /// Only set for values bound to a stored row.
    pub initial: Option<InitialValue>,

    /// Display label; `None` for values that are not punned.
    pub pun: Option<Pun>,

    pub info: Option<ValueInfo>,

    pub attributes: Option<AttributesMap>,

    pub extra: V,

    pub(crate) key: ValueKey,
}

/// Where a value is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueInfo {
    /// Missing for computed fields.
    pub field: Option<ColumnField>,

    pub field_ref: FieldRef,

    /// Id of the owning row; `None` until an added row is committed.
    pub id: Option<RowId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitialValue {
    pub value: Option<Value>,
    pub pun: Option<Pun>,
}

/// Identifies one incarnation of a value. Replaced every time the value is,
/// so late label resolutions can tell they are stale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ValueKey(u64);

impl ValueKey {
    pub(crate) fn next() -> Self {
        static NEXT_VALUE_KEY: AtomicU64 = AtomicU64::new(0);

        ValueKey(NEXT_VALUE_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

impl CombinedValue {
    /// A value not bound to any field.
    pub fn unbound(value: Option<Value>) -> Self {
        Self {
            value,
            raw_value: None,
            initial: None,
            pun: None,
            info: None,
            attributes: None,
            extra: (),
            key: ValueKey::next(),
        }
    }
}

impl<V> CombinedValue<V> {
    /// What the user sees: the raw input if any, else the validated value.
    pub fn current(&self) -> Option<&Value> {
        self.raw_value.as_ref().or(self.value.as_ref())
    }

    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    /// Text shown in a cell: the label when one is resolved, else the text
    /// of the current value.
    pub fn punned_text(&self) -> String {
        match &self.pun {
            Some(Pun::Label(label)) => label.clone(),
            _ => self.current().map(Value::to_text).unwrap_or_default(),
        }
    }

    /// The stored field this value belongs to, if any.
    pub fn field(&self) -> Option<&ColumnField> {
        self.info.as_ref()?.field.as_ref()
    }

    pub(crate) fn with_extra<T>(self, extra: T) -> CombinedValue<T> {
        CombinedValue {
            value: self.value,
            raw_value: self.raw_value,
            initial: self.initial,
            pun: self.pun,
            info: self.info,
            attributes: self.attributes,
            extra,
            key: self.key,
        }
    }

    /// Overlays a pending edit. The result counts as a new value.
    pub(crate) fn apply_update(&mut self, updated: &UpdatedValue) {
        self.value = updated.value.clone();
        self.raw_value = updated.raw_value.clone();
        self.key = ValueKey::next();
    }

    /// Restores the state recorded in `initial`, returning `false` when
    /// nothing was recorded.
    pub(crate) fn reset(&mut self) -> bool {
        let Some(initial) = &self.initial else {
            return false;
        };
        self.value = initial.value.clone();
        self.raw_value = None;
        self.pun = initial.pun.clone();
        self.key = ValueKey::next();
        true
    }

    /// Records the current state as the one resets return to.
    pub(crate) fn snapshot_initial(&mut self) {
        self.initial = Some(InitialValue {
            value: self.value.clone(),
            pun: self.pun.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_value_wins_over_value() {
        let mut value = CombinedValue::unbound(Some(Value::from(3)));
        assert_eq!(value.current(), Some(&Value::from(3)));

        value.raw_value = Some(Value::from("3x"));
        value.value = None;
        assert_eq!(value.current(), Some(&Value::from("3x")));
        assert!(!value.is_valid());
    }

    #[test]
    fn punned_text_prefers_label() {
        let mut value = CombinedValue::unbound(Some(Value::from(42)));
        assert_eq!(value.punned_text(), "42");

        value.pun = Some(Pun::Unresolved);
        assert_eq!(value.punned_text(), "42");

        value.pun = Some(Pun::Label("Item 42".to_string()));
        assert_eq!(value.punned_text(), "Item 42");
    }

    #[test]
    fn updates_and_resets_renew_the_key() {
        let mut value = CombinedValue::unbound(Some(Value::from("Alice")));
        value.snapshot_initial();
        let first = value.key;

        value.apply_update(&UpdatedValue::new("Alicia"));
        assert_ne!(value.key, first);
        assert_eq!(value.value, Some(Value::from("Alicia")));

        let updated = value.key;
        assert!(value.reset());
        assert_ne!(value.key, updated);
        assert_eq!(value.value, Some(Value::from("Alice")));
    }

    #[test]
    fn reset_without_initial_is_refused() {
        let mut value = CombinedValue::unbound(None);
        assert!(!value.reset());
    }
}
