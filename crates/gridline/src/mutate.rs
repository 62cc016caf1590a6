//! In-place changes to a reconciled view, driven by the staging store.
//!
//! Operations aimed at fields or rows the view does not show are silent
//! no-ops.

use crate::{
    pun::PunResolver,
    reconcile::{build_added_row, init_added_row},
    CombinedValue, CombinedView, Pun, ValueUpdate, ViewHandler,
};

use gridline_core::{
    refs::{CommittedRowRef, CommittedValueRef, RowRef, ValueRef},
    schema::{EntityRef, FieldRef},
    staging::UpdatedValue,
    AddedRowId, Error, Result, RowId, StagingSnapshot,
};
use tracing::trace;

/// How label resolution follows a value change.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Repun {
    Always,
    IfUnresolved,
}

impl<H: ViewHandler> CombinedView<H> {
    /// Applies an edit of a stored field to every cell showing it.
    pub fn update_field(&mut self, field: &FieldRef, id: RowId, updated: &UpdatedValue) {
        let targets = self.mappings.update.get(field, id).to_vec();
        if targets.is_empty() {
            trace!(%field, %id, "field not shown; ignoring update");
            return;
        }

        for target in targets {
            self.change_value(target.into(), Repun::Always, |value| {
                value.apply_update(updated);
                true
            });
        }
    }

    /// Reverts every cell showing a stored field to its reconciled state.
    pub fn reset_updated_field(&mut self, field: &FieldRef, id: RowId) {
        let targets = self.mappings.update.get(field, id).to_vec();
        if targets.is_empty() {
            trace!(%field, %id, "field not shown; ignoring reset");
            return;
        }

        for target in targets {
            self.change_value(target.into(), Repun::IfUnresolved, |value| value.reset());
        }
    }

    /// Starts showing a row the staging store has recorded as added.
    ///
    /// Fails when the view has no main entity, when the staging store does
    /// not know the row, or when the row is already shown.
    pub fn track_added_entry(&mut self, staging: &StagingSnapshot, id: AddedRowId) -> Result<()> {
        let Some(main) = self.cx.main_entity() else {
            return Err(Error::invariant_violation(format!(
                "added row {id} tracked by a view without a main entity"
            )));
        };
        if self.added.contains_key(&id) {
            return Err(Error::invariant_violation(format!(
                "added row {id} is already tracked"
            )));
        }
        let Some(entry) = staging.added_entry(main, id) else {
            return Err(Error::invariant_violation(format!(
                "added row {id} is not staged for {main}"
            )));
        };

        let row = build_added_row(&self.cx, &mut self.puns, main, id, entry);
        let row = init_added_row(&mut self.handler, &self.cx, &mut self.extra, id, row, None);
        self.added.insert(id, row);
        Ok(())
    }

    /// Applies an edit to an added row that has not been committed.
    pub fn set_added_field(&mut self, field: &FieldRef, id: AddedRowId, updated: &UpdatedValue) {
        if self.cx.main_entity() != Some(&field.entity) || !self.added.contains_key(&id) {
            trace!(%field, %id, "added row not shown; ignoring update");
            return;
        }

        let columns = self.mappings.main_columns.get(&field.name).to_vec();
        for column in columns {
            let target = ValueRef::new(RowRef::Added(id), column);
            self.change_value(target, Repun::Always, |value| {
                value.apply_update(updated);
                true
            });
        }
    }

    /// Records that an added row was persisted under `new_id`. The row keeps
    /// its added id but can now be reached through the mappings.
    pub fn commit_added_entry(&mut self, entity: &EntityRef, id: AddedRowId, new_id: RowId) {
        let Self {
            handler,
            cx,
            extra,
            added,
            mappings,
            rows_count,
            ..
        } = self;

        if cx.main_entity() != Some(entity) {
            trace!(%entity, %id, "not the main entity; ignoring commit");
            return;
        }
        let Some(row) = added.get_mut(&id) else {
            trace!(%entity, %id, "added row not shown; ignoring commit");
            return;
        };
        if row.new_id.is_some() {
            trace!(%entity, %id, "added row already committed");
            return;
        }

        row.new_id = Some(new_id);
        for (column, value) in row.values.iter_mut().enumerate() {
            let Some(info) = &mut value.info else { continue };
            info.id = Some(new_id);
            let value_ref = CommittedValueRef::new(CommittedRowRef::Added(id), column);
            mappings.update.insert(&info.field_ref, new_id, value_ref);
            value.snapshot_initial();
        }
        mappings
            .main_rows
            .insert(new_id, CommittedRowRef::Added(id));

        if !row.deleted {
            *rows_count += 1;
        }
        handler.commit_added_row(cx, extra, id, row);
    }

    /// Marks every row showing main entity row `id` as deleted.
    pub fn delete_entry(&mut self, entity: &EntityRef, id: RowId) {
        self.set_deleted(entity, id, true);
    }

    /// Reverts [`delete_entry`](Self::delete_entry).
    pub fn undelete_entry(&mut self, entity: &EntityRef, id: RowId) {
        self.set_deleted(entity, id, false);
    }

    /// Stops showing an added row.
    ///
    /// Fails when a committed row is missing from the main row mapping, which
    /// means the view was corrupted by an earlier call.
    pub fn reset_added_entry(&mut self, id: AddedRowId) -> Result<()> {
        let Some(row) = self.added.get(&id) else {
            trace!(%id, "added row not shown; ignoring reset");
            return Ok(());
        };
        if let Some(new_id) = row.new_id {
            if !self
                .mappings
                .main_rows
                .get(new_id)
                .contains(&CommittedRowRef::Added(id))
            {
                return Err(Error::invariant_violation(format!(
                    "committed added row {id} is missing from the main row mapping"
                )));
            }
        }

        let Self {
            handler,
            cx,
            extra,
            added,
            mappings,
            rows_count,
            ..
        } = self;

        let Some(mut row) = added.shift_remove(&id) else {
            return Ok(());
        };

        if let Some(new_id) = row.new_id {
            mappings
                .main_rows
                .remove(new_id, CommittedRowRef::Added(id));
            for (column, value) in row.values.iter().enumerate() {
                if let Some(info) = &value.info {
                    let value_ref = CommittedValueRef::new(CommittedRowRef::Added(id), column);
                    mappings.update.remove(&info.field_ref, new_id, value_ref);
                }
            }
            if !row.deleted {
                *rows_count -= 1;
            }
        }

        handler.delete_added_row(cx, extra, id, &mut row);
        Ok(())
    }

    fn set_deleted(&mut self, entity: &EntityRef, id: RowId, deleted: bool) {
        let Self {
            handler,
            cx,
            extra,
            rows,
            added,
            mappings,
            rows_count,
            ..
        } = self;

        if cx.main_entity() != Some(entity) {
            trace!(%entity, %id, deleted, "not the main entity; ignoring");
            return;
        }

        for row_ref in mappings.main_rows.get(id) {
            match *row_ref {
                CommittedRowRef::Existing(position) => {
                    let Some(row) = rows.as_mut().and_then(|rows| rows.get_mut(position)) else {
                        continue;
                    };
                    if row.deleted == deleted {
                        continue;
                    }
                    row.deleted = deleted;
                    if deleted {
                        *rows_count -= 1;
                        handler.delete_row(cx, extra, position, row);
                    } else {
                        *rows_count += 1;
                        handler.undelete_row(cx, extra, position, row);
                    }
                }
                CommittedRowRef::Added(added_id) => {
                    let Some(row) = added.get_mut(&added_id) else {
                        continue;
                    };
                    if row.deleted == deleted {
                        continue;
                    }
                    row.deleted = deleted;
                    if deleted {
                        *rows_count -= 1;
                        handler.delete_added_row(cx, extra, added_id, row);
                    } else {
                        *rows_count += 1;
                        handler.undelete_added_row(cx, extra, added_id, row);
                    }
                }
            }
        }
    }

    /// Runs `change` on the value at `target` and notifies the handler when
    /// it reports a change.
    fn change_value(
        &mut self,
        target: ValueRef,
        repun: Repun,
        change: impl FnOnce(&mut CombinedValue<H::Value>) -> bool,
    ) {
        let Self {
            handler,
            cx,
            extra,
            rows,
            added,
            empty_row,
            puns,
            ..
        } = self;
        let column = target.column;

        match target.row {
            RowRef::Existing(position) => {
                let Some(row) = rows.as_mut().and_then(|rows| rows.get_mut(position)) else {
                    return;
                };
                let Some(value) = row.values.get_mut(column) else {
                    return;
                };
                if let Some(update) = apply(puns, target, value, repun, change) {
                    handler.update_value(cx, extra, position, row, column, &update);
                }
            }
            RowRef::Added(id) => {
                let Some(row) = added.get_mut(&id) else {
                    return;
                };
                let Some(value) = row.values.get_mut(column) else {
                    return;
                };
                if let Some(update) = apply(puns, target, value, repun, change) {
                    handler.update_added_value(cx, extra, id, row, column, &update);
                }
            }
            RowRef::New => {
                let Some(row) = empty_row.as_mut() else {
                    return;
                };
                let Some(value) = row.values.get_mut(column) else {
                    return;
                };
                if let Some(update) = apply(puns, target, value, repun, change) {
                    handler.update_empty_value(cx, extra, row, column, &update);
                }
            }
        }
    }
}

fn apply<V>(
    puns: &mut PunResolver,
    target: ValueRef,
    value: &mut CombinedValue<V>,
    repun: Repun,
    change: impl FnOnce(&mut CombinedValue<V>) -> bool,
) -> Option<ValueUpdate> {
    let previous = value.current().cloned();
    if !change(value) {
        return None;
    }

    let wants_pun = match repun {
        Repun::Always => true,
        Repun::IfUnresolved => value.pun.as_ref().is_some_and(Pun::is_unresolved),
    };
    if wants_pun {
        if let Some(field_type) = value.field().map(|field| field.field_type.clone()) {
            puns.request(target, value, &field_type);
        }
    }

    Some(ValueUpdate::Value { previous })
}
