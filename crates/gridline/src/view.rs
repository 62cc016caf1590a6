//! The reconciled view and its rows.

mod context;
pub use context::{RowLoadState, ViewContext};

mod row;
pub use row::{AddedRow, EmptyRow, ExistingRow};

mod row_view;
pub use row_view::RowView;

mod value;
pub use value::{CombinedValue, InitialValue, ValueInfo};
pub(crate) use value::ValueKey;

use crate::{
    mapping::{MainColumnMapping, MainRowMapping, Mappings, UpdateMapping},
    pun::PunResolver,
    ViewHandler,
};

use gridline_core::{
    refs::{CommittedRowRef, RowPosition, RowRef, ValueRef},
    schema::{EntityRef, ResultViewInfo},
    AddedRowId,
};
use indexmap::IndexMap;
use std::collections::HashMap;

pub type ExistingRowOf<H> = ExistingRow<<H as ViewHandler>::Value, <H as ViewHandler>::Row>;
pub type AddedRowOf<H> = AddedRow<<H as ViewHandler>::Value, <H as ViewHandler>::Row>;
pub type EmptyRowOf<H> = EmptyRow<<H as ViewHandler>::Value, <H as ViewHandler>::Row>;
pub type RowViewOf<'a, H> = RowView<'a, <H as ViewHandler>::Value, <H as ViewHandler>::Row>;

/// Result rows, locally added rows and the template row of one query,
/// together with the consumer state attached to them.
///
/// Built by [`CombinedView::new`] and rebuilt by [`CombinedView::reconcile`];
/// between rebuilds it is changed in place through the mutation methods.
pub struct CombinedView<H: ViewHandler> {
    pub(crate) handler: H,

    pub(crate) cx: ViewContext,

    pub(crate) extra: H::View,

    /// `None` when the result carried metadata only.
    pub(crate) rows: Option<Vec<ExistingRowOf<H>>>,

    /// In insertion order.
    pub(crate) added: IndexMap<AddedRowId, AddedRowOf<H>>,

    pub(crate) empty_row: Option<EmptyRowOf<H>>,

    pub(crate) mappings: Mappings,

    /// Added id → existing rows that are its persisted form.
    pub(crate) old_committed_rows: HashMap<AddedRowId, Vec<RowPosition>>,

    /// Rows not deleted, existing and committed added.
    pub(crate) rows_count: usize,

    pub(crate) puns: PunResolver,

    pub(crate) prefetch_targets: Vec<EntityRef>,
}

impl<H: ViewHandler> std::fmt::Debug for CombinedView<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedView")
            .field("source", &self.cx.args.source)
            .field("rows", &self.rows.as_ref().map(Vec::len))
            .field("added", &self.added.len())
            .field("rows_count", &self.rows_count)
            .finish()
    }
}

impl<H: ViewHandler> CombinedView<H> {
    pub fn context(&self) -> &ViewContext {
        &self.cx
    }

    pub fn info(&self) -> &ResultViewInfo {
        &self.cx.info
    }

    pub fn extra(&self) -> &H::View {
        &self.extra
    }

    pub fn extra_mut(&mut self) -> &mut H::View {
        &mut self.extra
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Number of visible rows: existing and committed added rows that are
    /// not deleted.
    pub fn rows_count(&self) -> usize {
        self.rows_count
    }

    pub fn existing_rows(&self) -> Option<&[ExistingRowOf<H>]> {
        self.rows.as_deref()
    }

    pub fn existing_row(&self, position: RowPosition) -> Option<&ExistingRowOf<H>> {
        self.rows.as_ref()?.get(position)
    }

    pub fn added_row(&self, id: AddedRowId) -> Option<&AddedRowOf<H>> {
        self.added.get(&id)
    }

    /// Added rows in insertion order.
    pub fn added_rows(&self) -> impl Iterator<Item = (AddedRowId, &AddedRowOf<H>)> {
        self.added.iter().map(|(id, row)| (*id, row))
    }

    pub fn empty_row(&self) -> Option<&EmptyRowOf<H>> {
        self.empty_row.as_ref()
    }

    /// Deleted existing rows are not returned.
    pub fn row(&self, row: RowRef) -> Option<RowViewOf<'_, H>> {
        match row {
            RowRef::Existing(position) => {
                let row = self.existing_row(position)?;
                (!row.deleted).then_some(RowView::Existing(row))
            }
            RowRef::Added(id) => self.added.get(&id).map(RowView::Added),
            RowRef::New => self.empty_row.as_ref().map(RowView::Empty),
        }
    }

    pub fn value(&self, value: ValueRef) -> Option<&CombinedValue<H::Value>> {
        self.row(value.row)?.value(value.column)
    }

    /// Existing rows, added rows, then the empty row.
    pub fn iter_rows(&self) -> impl Iterator<Item = (RowRef, RowViewOf<'_, H>)> {
        self.iter_existing()
            .map(|(position, row)| (RowRef::Existing(position), RowView::Existing(row)))
            .chain(
                self.added
                    .iter()
                    .map(|(id, row)| (RowRef::Added(*id), RowView::Added(row))),
            )
            .chain(
                self.empty_row
                    .iter()
                    .map(|row| (RowRef::New, RowView::Empty(row))),
            )
    }

    /// Existing and added rows that are not deleted.
    pub fn iter_visible_rows(&self) -> impl Iterator<Item = (RowRef, RowViewOf<'_, H>)> {
        self.iter_rows()
            .filter(|(row_ref, row)| !row_ref.is_new() && !row.is_deleted())
    }

    /// Existing rows and committed added rows.
    pub fn iter_committed_rows(
        &self,
    ) -> impl Iterator<Item = (CommittedRowRef, RowViewOf<'_, H>)> {
        self.iter_existing()
            .map(|(position, row)| (CommittedRowRef::Existing(position), RowView::Existing(row)))
            .chain(
                self.added
                    .iter()
                    .filter(|(_, row)| row.is_committed())
                    .map(|(id, row)| (CommittedRowRef::Added(*id), RowView::Added(row))),
            )
    }

    pub fn map_rows<A>(&self, mut f: impl FnMut(RowViewOf<'_, H>, RowRef) -> A) -> Vec<A> {
        self.iter_rows().map(|(r, row)| f(row, r)).collect()
    }

    pub fn map_visible_rows<A>(
        &self,
        mut f: impl FnMut(RowViewOf<'_, H>, RowRef) -> A,
    ) -> Vec<A> {
        self.iter_visible_rows().map(|(r, row)| f(row, r)).collect()
    }

    pub fn map_committed_rows<A>(
        &self,
        mut f: impl FnMut(RowViewOf<'_, H>, CommittedRowRef) -> A,
    ) -> Vec<A> {
        self.iter_committed_rows().map(|(r, row)| f(row, r)).collect()
    }

    pub fn update_mapping(&self) -> &UpdateMapping {
        &self.mappings.update
    }

    pub fn main_column_mapping(&self) -> &MainColumnMapping {
        &self.mappings.main_columns
    }

    pub fn main_row_mapping(&self) -> &MainRowMapping {
        &self.mappings.main_rows
    }

    /// Positions of the existing rows that are the persisted form of added
    /// row `id` from a previous view.
    pub fn committed_positions(&self, id: AddedRowId) -> &[RowPosition] {
        self.old_committed_rows
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Entities whose metadata edits of this view will need.
    pub fn prefetch_targets(&self) -> &[EntityRef] {
        &self.prefetch_targets
    }

    /// Returns `true` while label lookups are queued.
    pub fn has_pending_labels(&self) -> bool {
        self.puns.has_pending()
    }

    fn iter_existing(&self) -> impl Iterator<Item = (RowPosition, &ExistingRowOf<H>)> {
        self.rows.iter().flatten().enumerate()
    }
}
