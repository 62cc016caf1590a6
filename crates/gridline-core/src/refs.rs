//! Addressing rows and values of a reconciled view.
//!
//! References are plain data: comparing two references never consults the
//! view. They are only meaningful for the view they were taken from; existing
//! row positions in particular shift between reconciliations.

mod id;
pub use id::{AddedRowId, RowId};

mod row_ref;
pub use row_ref::{CommittedRowRef, RowKey, RowRef};

mod value_ref;
pub use value_ref::{CommittedValueRef, ValueRef};

/// Position of a row in the fetched result batch.
pub type RowPosition = usize;

/// Position of a column in the result.
pub type ColumnPosition = usize;
