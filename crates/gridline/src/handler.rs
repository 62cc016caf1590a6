//! Lifecycle callbacks through which consumers attach their own state to a
//! view, its rows and its values.

use crate::view::{AddedRow, CombinedValue, EmptyRow, ExistingRow, ViewContext};

use gridline_core::{
    refs::{ColumnPosition, RowPosition},
    AddedRowId, Value,
};

/// What changed in a value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueUpdate {
    /// Only the display label changed.
    Pun,

    /// The value itself was replaced.
    Value {
        /// What [`CombinedValue::current`] returned before.
        previous: Option<Value>,
    },
}

/// Consumer of a [`CombinedView`](crate::CombinedView).
///
/// Every element of a view carries an `extra` produced by one of the
/// `create_*` methods. When a view is reconciled, the `extra` of the matching
/// element of the previous view is passed in as `old`; elements without a
/// match get `None`.
///
/// Within a row, the row's `extra` is created first, then the `extra` of each
/// value, then `post_init_*` runs on the finished row. Rows are finished one
/// at a time: existing rows in order, then added rows, then the empty row,
/// and finally `post_init_view`.
#[allow(unused_variables)]
pub trait ViewHandler {
    type Value;
    type Row;
    type View;

    fn create_view(&mut self, cx: &ViewContext, old: Option<&Self::View>) -> Self::View;

    fn post_init_view(&mut self, cx: &ViewContext, view: &mut Self::View) {}

    // ===== Existing rows =====

    fn create_row(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        position: RowPosition,
        row: &ExistingRow,
        old: Option<Self::Row>,
    ) -> Self::Row;

    fn create_value(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        position: RowPosition,
        row: &ExistingRow<(), Self::Row>,
        column: ColumnPosition,
        value: &CombinedValue,
        old: Option<Self::Value>,
    ) -> Self::Value;

    fn post_init_row(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        position: RowPosition,
        row: &mut ExistingRow<Self::Value, Self::Row>,
    ) {
    }

    fn update_value(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        position: RowPosition,
        row: &mut ExistingRow<Self::Value, Self::Row>,
        column: ColumnPosition,
        update: &ValueUpdate,
    ) {
    }

    fn delete_row(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        position: RowPosition,
        row: &mut ExistingRow<Self::Value, Self::Row>,
    ) {
    }

    fn undelete_row(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        position: RowPosition,
        row: &mut ExistingRow<Self::Value, Self::Row>,
    ) {
    }

    // ===== Added rows =====

    fn create_added_row(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        id: AddedRowId,
        row: &AddedRow,
        old: Option<Self::Row>,
    ) -> Self::Row;

    fn create_added_value(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        id: AddedRowId,
        row: &AddedRow<(), Self::Row>,
        column: ColumnPosition,
        value: &CombinedValue,
        old: Option<Self::Value>,
    ) -> Self::Value;

    fn post_init_added_row(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        id: AddedRowId,
        row: &mut AddedRow<Self::Value, Self::Row>,
    ) {
    }

    fn update_added_value(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        id: AddedRowId,
        row: &mut AddedRow<Self::Value, Self::Row>,
        column: ColumnPosition,
        update: &ValueUpdate,
    ) {
    }

    /// Called when a committed added row is deleted, and when an added row
    /// is discarded. In the latter case the row is dropped afterwards.
    fn delete_added_row(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        id: AddedRowId,
        row: &mut AddedRow<Self::Value, Self::Row>,
    ) {
    }

    fn undelete_added_row(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        id: AddedRowId,
        row: &mut AddedRow<Self::Value, Self::Row>,
    ) {
    }

    fn commit_added_row(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        id: AddedRowId,
        row: &mut AddedRow<Self::Value, Self::Row>,
    ) {
    }

    // ===== Empty row =====

    fn create_empty_row(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        row: &EmptyRow,
        old: Option<Self::Row>,
    ) -> Self::Row;

    fn create_empty_value(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        row: &EmptyRow<(), Self::Row>,
        column: ColumnPosition,
        value: &CombinedValue,
        old: Option<Self::Value>,
    ) -> Self::Value;

    fn post_init_empty_row(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        row: &mut EmptyRow<Self::Value, Self::Row>,
    ) {
    }

    fn update_empty_value(
        &mut self,
        cx: &ViewContext,
        view: &mut Self::View,
        row: &mut EmptyRow<Self::Value, Self::Row>,
        column: ColumnPosition,
        update: &ValueUpdate,
    ) {
    }
}

/// Keeps no state of its own; every `extra` is `()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl ViewHandler for NoopHandler {
    type Value = ();
    type Row = ();
    type View = ();

    fn create_view(&mut self, _cx: &ViewContext, _old: Option<&()>) {}

    fn create_row(
        &mut self,
        _cx: &ViewContext,
        _view: &mut (),
        _position: RowPosition,
        _row: &ExistingRow,
        _old: Option<()>,
    ) {
    }

    fn create_value(
        &mut self,
        _cx: &ViewContext,
        _view: &mut (),
        _position: RowPosition,
        _row: &ExistingRow,
        _column: ColumnPosition,
        _value: &CombinedValue,
        _old: Option<()>,
    ) {
    }

    fn create_added_row(
        &mut self,
        _cx: &ViewContext,
        _view: &mut (),
        _id: AddedRowId,
        _row: &AddedRow,
        _old: Option<()>,
    ) {
    }

    fn create_added_value(
        &mut self,
        _cx: &ViewContext,
        _view: &mut (),
        _id: AddedRowId,
        _row: &AddedRow,
        _column: ColumnPosition,
        _value: &CombinedValue,
        _old: Option<()>,
    ) {
    }

    fn create_empty_row(
        &mut self,
        _cx: &ViewContext,
        _view: &mut (),
        _row: &EmptyRow,
        _old: Option<()>,
    ) {
    }

    fn create_empty_value(
        &mut self,
        _cx: &ViewContext,
        _view: &mut (),
        _row: &EmptyRow,
        _column: ColumnPosition,
        _value: &CombinedValue,
        _old: Option<()>,
    ) {
    }
}
