use super::{ColumnPosition, CommittedRowRef, RowRef};

/// Addresses a single value of a reconciled view.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ValueRef {
    pub row: RowRef,
    pub column: ColumnPosition,
}

/// A value of a row that is, or will be, backed by a stored row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CommittedValueRef {
    pub row: CommittedRowRef,
    pub column: ColumnPosition,
}

impl ValueRef {
    pub fn new(row: RowRef, column: ColumnPosition) -> Self {
        Self { row, column }
    }
}

impl CommittedValueRef {
    pub fn new(row: CommittedRowRef, column: ColumnPosition) -> Self {
        Self { row, column }
    }
}

impl From<CommittedValueRef> for ValueRef {
    fn from(value: CommittedValueRef) -> Self {
        Self {
            row: value.row.into(),
            column: value.column,
        }
    }
}
