use super::{AddedRowId, RowPosition};
use std::fmt;

/// Addresses a row of a reconciled view.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RowRef {
    /// A row from the last fetched batch.
    Existing(RowPosition),

    /// A locally added row.
    Added(AddedRowId),

    /// The template row used for entering new rows. There is at most one.
    New,
}

/// A row that is, or will be, backed by a stored row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CommittedRowRef {
    Existing(RowPosition),
    Added(AddedRowId),
}

/// Stable key for rendering a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Existing(RowPosition),
    Added(AddedRowId),
    New,
}

impl RowRef {
    pub fn key(&self) -> RowKey {
        match *self {
            Self::Existing(position) => RowKey::Existing(position),
            Self::Added(id) => RowKey::Added(id),
            Self::New => RowKey::New,
        }
    }

    pub fn is_existing(&self) -> bool {
        matches!(self, Self::Existing(_))
    }

    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::New)
    }

    /// Returns the committed form of this reference, or `None` for the
    /// template row.
    pub fn to_committed(&self) -> Option<CommittedRowRef> {
        match *self {
            Self::Existing(position) => Some(CommittedRowRef::Existing(position)),
            Self::Added(id) => Some(CommittedRowRef::Added(id)),
            Self::New => None,
        }
    }
}

impl From<CommittedRowRef> for RowRef {
    fn from(value: CommittedRowRef) -> Self {
        match value {
            CommittedRowRef::Existing(position) => Self::Existing(position),
            CommittedRowRef::Added(id) => Self::Added(id),
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Existing(position) => write!(f, "{position}"),
            Self::Added(id) => write!(f, "added-{id}"),
            Self::New => f.write_str("new"),
        }
    }
}
