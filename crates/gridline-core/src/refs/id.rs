use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stored row, assigned by the backing store.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub i64);

/// Client-assigned identifier of a row that was added locally and is not
/// yet known to the backing store.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddedRowId(pub u64);

impl fmt::Debug for RowId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "RowId({})", self.0)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, fmt)
    }
}

impl From<i64> for RowId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Debug for AddedRowId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "AddedRowId({})", self.0)
    }
}

impl fmt::Display for AddedRowId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, fmt)
    }
}

impl From<u64> for AddedRowId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
