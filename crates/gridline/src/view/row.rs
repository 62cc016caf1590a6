use super::CombinedValue;

use gridline_core::{
    result::EntityId,
    schema::{AttributesMap, DomainId},
    AddedRowId, RowId,
};
use indexmap::IndexMap;

/// A row of the last fetched result.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingRow<V = (), R = ()> {
    pub values: Vec<CombinedValue<V>>,

    pub domain_id: Option<DomainId>,

    /// Id of the main entity row; `None` for rows that are not editable as a
    /// whole, such as aggregates.
    pub main_id: Option<RowId>,

    pub entity_ids: Option<IndexMap<String, EntityId>>,

    pub attributes: Option<AttributesMap>,

    /// Deleted locally, pending confirmation.
    pub deleted: bool,

    /// Set when this row is the persisted form of an earlier added row.
    pub old_added_id: Option<AddedRowId>,

    pub extra: R,
}

/// A row added locally. Stays addressed by its added id after commit.
#[derive(Debug, Clone, PartialEq)]
pub struct AddedRow<V = (), R = ()> {
    pub values: Vec<CombinedValue<V>>,

    pub deleted: bool,

    /// Durable id, once the row is committed.
    pub new_id: Option<RowId>,

    pub extra: R,
}

/// Template row holding default values for inserts.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyRow<V = (), R = ()> {
    pub values: Vec<CombinedValue<V>>,
    pub extra: R,
}

impl<R> ExistingRow<(), R> {
    pub(crate) fn with_extra<T>(self, extra: T) -> ExistingRow<(), T> {
        ExistingRow {
            values: self.values,
            domain_id: self.domain_id,
            main_id: self.main_id,
            entity_ids: self.entity_ids,
            attributes: self.attributes,
            deleted: self.deleted,
            old_added_id: self.old_added_id,
            extra,
        }
    }

    pub(crate) fn with_value_extras<V>(self, extras: Vec<V>) -> ExistingRow<V, R> {
        ExistingRow {
            values: attach(self.values, extras),
            domain_id: self.domain_id,
            main_id: self.main_id,
            entity_ids: self.entity_ids,
            attributes: self.attributes,
            deleted: self.deleted,
            old_added_id: self.old_added_id,
            extra: self.extra,
        }
    }
}

impl<R> AddedRow<(), R> {
    pub(crate) fn with_extra<T>(self, extra: T) -> AddedRow<(), T> {
        AddedRow {
            values: self.values,
            deleted: self.deleted,
            new_id: self.new_id,
            extra,
        }
    }

    pub(crate) fn with_value_extras<V>(self, extras: Vec<V>) -> AddedRow<V, R> {
        AddedRow {
            values: attach(self.values, extras),
            deleted: self.deleted,
            new_id: self.new_id,
            extra: self.extra,
        }
    }
}

impl<R> EmptyRow<(), R> {
    pub(crate) fn with_extra<T>(self, extra: T) -> EmptyRow<(), T> {
        EmptyRow {
            values: self.values,
            extra,
        }
    }

    pub(crate) fn with_value_extras<V>(self, extras: Vec<V>) -> EmptyRow<V, R> {
        EmptyRow {
            values: attach(self.values, extras),
            extra: self.extra,
        }
    }
}

impl<V, R> AddedRow<V, R> {
    pub fn is_committed(&self) -> bool {
        self.new_id.is_some()
    }
}

fn attach<V>(values: Vec<CombinedValue>, extras: Vec<V>) -> Vec<CombinedValue<V>> {
    debug_assert_eq!(values.len(), extras.len());
    values
        .into_iter()
        .zip(extras)
        .map(|(value, extra)| value.with_extra(extra))
        .collect()
}
