use super::{AddedRow, CombinedValue, EmptyRow, ExistingRow};

use gridline_core::schema::AttributesMap;

/// Borrowed row of any kind.
#[derive(Debug)]
pub enum RowView<'a, V, R> {
    Existing(&'a ExistingRow<V, R>),
    Added(&'a AddedRow<V, R>),
    Empty(&'a EmptyRow<V, R>),
}

impl<V, R> Clone for RowView<'_, V, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V, R> Copy for RowView<'_, V, R> {}

impl<'a, V, R> RowView<'a, V, R> {
    pub fn values(&self) -> &'a [CombinedValue<V>] {
        match self {
            Self::Existing(row) => &row.values,
            Self::Added(row) => &row.values,
            Self::Empty(row) => &row.values,
        }
    }

    pub fn value(&self, column: usize) -> Option<&'a CombinedValue<V>> {
        self.values().get(column)
    }

    pub fn extra(&self) -> &'a R {
        match self {
            Self::Existing(row) => &row.extra,
            Self::Added(row) => &row.extra,
            Self::Empty(row) => &row.extra,
        }
    }

    /// The template row is never deleted.
    pub fn is_deleted(&self) -> bool {
        match self {
            Self::Existing(row) => row.deleted,
            Self::Added(row) => row.deleted,
            Self::Empty(_) => false,
        }
    }

    pub fn attributes(&self) -> Option<&'a AttributesMap> {
        match self {
            Self::Existing(row) => row.attributes.as_ref(),
            Self::Added(_) | Self::Empty(_) => None,
        }
    }

    pub fn as_existing(&self) -> Option<&'a ExistingRow<V, R>> {
        match self {
            Self::Existing(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_added(&self) -> Option<&'a AddedRow<V, R>> {
        match self {
            Self::Added(row) => Some(row),
            _ => None,
        }
    }
}
