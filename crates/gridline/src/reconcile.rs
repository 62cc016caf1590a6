//! Building a view from a fresh result, and rebuilding it from a previous one.

use crate::{
    mapping::{MainColumnMapping, MainRowMapping, Mappings, UpdateMapping},
    pun::PunResolver,
    view::{
        AddedRow, AddedRowOf, CombinedValue, EmptyRow, EmptyRowOf, ExistingRow, ExistingRowOf,
        RowLoadState, ValueInfo, ViewContext,
    },
    CombinedView, Pun, ViewHandler,
};

use gridline_core::{
    provider::LabelCache,
    refs::{CommittedRowRef, RowPosition, RowRef, ValueRef},
    result::{ExecutedRow, ExecutedValue, ViewResult},
    schema::{EntityRef, FieldName, FieldRef, ResultViewInfo, ViewArguments, ViewSource},
    staging::AddedEntry,
    AddedRowId, RowId, StagingSnapshot, Value,
};
use indexmap::IndexMap;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

/// Everything a reconciliation consumes.
#[derive(Debug)]
pub struct ReconcileInput<'a> {
    pub args: ViewArguments,

    pub result: ViewResult,

    /// Pending local changes, read once while building.
    pub staging: &'a StagingSnapshot,

    /// Raw values the template row starts from, by main entity field.
    pub default_raw_values: IndexMap<FieldName, Value>,

    pub row_load_state: RowLoadState,
}

impl<'a> ReconcileInput<'a> {
    pub fn new(args: ViewArguments, result: ViewResult, staging: &'a StagingSnapshot) -> Self {
        let fetched_row_count = result.rows.as_ref().map_or(0, Vec::len);
        Self {
            args,
            result,
            staging,
            default_raw_values: IndexMap::new(),
            row_load_state: RowLoadState {
                fetched_row_count,
                ..RowLoadState::default()
            },
        }
    }

    pub fn default_raw_values(mut self, values: IndexMap<FieldName, Value>) -> Self {
        self.default_raw_values = values;
        self
    }

    pub fn row_load_state(mut self, state: RowLoadState) -> Self {
        self.row_load_state = state;
        self
    }
}

/// The parts of a previous view that a rebuild draws on.
struct OldView<H: ViewHandler> {
    info: ResultViewInfo,
    source: ViewSource,
    extra: H::View,
    /// Taken as rows are matched.
    rows: Vec<Option<ExistingRowOf<H>>>,
    added: IndexMap<AddedRowId, AddedRowOf<H>>,
    empty_row: Option<EmptyRowOf<H>>,
    main_rows: MainRowMapping,
}

/// Consumer state of an old row, moved out so it can be handed over.
pub(crate) struct OldExtras<V, R> {
    row: R,
    values: Vec<Option<V>>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Correlation {
    MainId,
    Position,
    Disabled,
}

#[derive(Debug, Default)]
struct Matches {
    by_added_id: usize,
    by_main_id: usize,
    by_position: usize,
}

impl<H: ViewHandler> CombinedView<H> {
    /// Builds a view with no predecessor.
    pub fn new(handler: H, labels: Arc<dyn LabelCache>, input: ReconcileInput<'_>) -> Self {
        build(handler, PunResolver::new(labels), input, None)
    }

    /// Builds the next view of the same query, handing the consumer state of
    /// this view over to the matching elements of the new one.
    ///
    /// Label lookups still queued on this view are dropped.
    pub fn reconcile(self, input: ReconcileInput<'_>) -> Self {
        let CombinedView {
            handler,
            cx,
            extra,
            rows,
            added,
            empty_row,
            mappings,
            puns,
            ..
        } = self;

        let old = OldView {
            info: cx.info,
            source: cx.args.source,
            extra,
            rows: rows.into_iter().flatten().map(Some).collect(),
            added,
            empty_row,
            main_rows: mappings.main_rows,
        };
        let resolver = PunResolver::new(puns.labels().clone()).inherit(puns);

        build(handler, resolver, input, Some(old))
    }
}

fn build<H: ViewHandler>(
    mut handler: H,
    mut puns: PunResolver,
    input: ReconcileInput<'_>,
    mut old: Option<OldView<H>>,
) -> CombinedView<H> {
    let ReconcileInput {
        args,
        mut result,
        staging,
        default_raw_values,
        row_load_state,
    } = input;

    let cx = ViewContext::new(args, &mut result, default_raw_values, row_load_state);
    let main_columns = MainColumnMapping::build(&cx.info);

    let mut rows = result.rows.take().map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(position, row)| build_existing_row(&cx, staging, &mut puns, position, row))
            .collect::<Vec<_>>()
    });
    let main_rows = match (&rows, cx.main_entity()) {
        (Some(rows), Some(_)) => MainRowMapping::build(rows),
        _ => MainRowMapping::default(),
    };
    let update = rows
        .as_deref()
        .map(UpdateMapping::build)
        .unwrap_or_default();

    // Added rows survive as long as the staging store still lists them.
    let mut added = IndexMap::new();
    if let (Some(old), Some(main)) = (&old, cx.main_entity()) {
        for id in old.added.keys() {
            if let Some(entry) = staging.added_entry(main, *id) {
                added.insert(*id, build_added_row(&cx, &mut puns, main, *id, entry));
            }
        }
    }

    let empty_row = build_empty_row(&cx, &mut puns);

    let mut old_committed_rows: HashMap<AddedRowId, Vec<RowPosition>> = HashMap::new();
    let correlation = match &old {
        Some(old) if old.info.same_main_entity(&cx.info) => Correlation::MainId,
        Some(old)
            if old.info.main_entity.is_none()
                && cx.info.main_entity.is_none()
                && old.source == cx.args.source =>
        {
            Correlation::Position
        }
        _ => Correlation::Disabled,
    };

    if let (Some(old), Some(rows), Correlation::MainId) = (&old, &mut rows, correlation) {
        for (id, old_row) in &old.added {
            let Some(new_id) = old_row.new_id else { continue };
            for row_ref in main_rows.get(new_id) {
                if let CommittedRowRef::Existing(position) = *row_ref {
                    rows[position].old_added_id = Some(*id);
                    old_committed_rows.entry(*id).or_default().push(position);
                }
            }
        }
    }

    let mut extra = handler.create_view(&cx, old.as_ref().map(|old| &old.extra));

    let mut matches = Matches::default();
    let mut offsets: HashMap<RowId, usize> = HashMap::new();
    let mut rows_count = 0;
    let rows = rows.map(|bare| {
        let mut built = Vec::with_capacity(bare.len());
        for (position, mut row) in bare.into_iter().enumerate() {
            let old_row = old.as_mut().and_then(|old| {
                take_old_row(old, &mut row, position, correlation, &mut offsets, &mut matches)
            });
            if let Some(id) = row.old_added_id {
                let positions = old_committed_rows.entry(id).or_default();
                if !positions.contains(&position) {
                    positions.push(position);
                }
            }
            if !row.deleted {
                rows_count += 1;
            }
            built.push(init_existing_row(
                &mut handler,
                &cx,
                &mut extra,
                position,
                row,
                old_row,
            ));
        }
        built
    });

    let mut built_added = IndexMap::with_capacity(added.len());
    for (id, row) in added {
        let old_row = old
            .as_mut()
            .and_then(|old| old.added.shift_remove(&id))
            .map(|row| OldExtras::new(row.extra, row.values));
        built_added.insert(
            id,
            init_added_row(&mut handler, &cx, &mut extra, id, row, old_row),
        );
    }

    let empty_row = empty_row.map(|row| {
        let old_row = old
            .as_mut()
            .and_then(|old| old.empty_row.take())
            .map(|row| OldExtras::new(row.extra, row.values));
        init_empty_row(&mut handler, &cx, &mut extra, row, old_row)
    });

    handler.post_init_view(&cx, &mut extra);

    debug!(
        rows = rows.as_ref().map_or(0, Vec::len),
        rows_count,
        added = built_added.len(),
        by_added_id = matches.by_added_id,
        by_main_id = matches.by_main_id,
        by_position = matches.by_position,
        "reconciled view"
    );

    let prefetch_targets = prefetch_targets(&cx.info, rows.is_some());

    CombinedView {
        handler,
        cx,
        extra,
        rows,
        added: built_added,
        empty_row,
        mappings: Mappings {
            update,
            main_columns,
            main_rows,
        },
        old_committed_rows,
        rows_count,
        puns,
        prefetch_targets,
    }
}

/// Finds the old row `row` continues, in order of preference: the added row
/// it was committed from, the next unmatched row with the same main id, or
/// the row at the same position.
fn take_old_row<H: ViewHandler>(
    old: &mut OldView<H>,
    row: &mut ExistingRow,
    position: RowPosition,
    correlation: Correlation,
    offsets: &mut HashMap<RowId, usize>,
    matches: &mut Matches,
) -> Option<OldExtras<H::Value, H::Row>> {
    if let Some(id) = row.old_added_id {
        let old_row = old.added.shift_remove(&id)?;
        matches.by_added_id += 1;
        return Some(OldExtras::new(old_row.extra, old_row.values));
    }

    let old_row = match correlation {
        Correlation::MainId => {
            let main_id = row.main_id?;
            let offset = offsets.entry(main_id).or_insert(0);
            let old_position = old
                .main_rows
                .get(main_id)
                .iter()
                .filter_map(|row_ref| match row_ref {
                    CommittedRowRef::Existing(position) => Some(*position),
                    CommittedRowRef::Added(_) => None,
                })
                .nth(*offset)?;
            *offset += 1;
            let old_row = old.rows.get_mut(old_position)?.take()?;
            row.old_added_id = old_row.old_added_id;
            matches.by_main_id += 1;
            old_row
        }
        Correlation::Position => {
            let old_row = old.rows.get_mut(position)?.take()?;
            matches.by_position += 1;
            old_row
        }
        Correlation::Disabled => return None,
    };

    Some(OldExtras::new(old_row.extra, old_row.values))
}

impl<V, R> OldExtras<V, R> {
    fn new(row: R, values: Vec<CombinedValue<V>>) -> Self {
        Self {
            row,
            values: values.into_iter().map(|value| Some(value.extra)).collect(),
        }
    }
}

fn split<V, R>(old: Option<OldExtras<V, R>>) -> (Option<R>, Vec<Option<V>>) {
    match old {
        Some(old) => (Some(old.row), old.values),
        None => (None, vec![]),
    }
}

fn take_value<V>(values: &mut [Option<V>], column: usize) -> Option<V> {
    values.get_mut(column).and_then(Option::take)
}

pub(crate) fn init_existing_row<H: ViewHandler>(
    handler: &mut H,
    cx: &ViewContext,
    view: &mut H::View,
    position: RowPosition,
    row: ExistingRow,
    old: Option<OldExtras<H::Value, H::Row>>,
) -> ExistingRowOf<H> {
    let (old_row, mut old_values) = split(old);

    let extra = handler.create_row(cx, view, position, &row, old_row);
    let row = row.with_extra(extra);

    let extras: Vec<H::Value> = (0..row.values.len())
        .map(|column| {
            let old = take_value(&mut old_values, column);
            handler.create_value(cx, view, position, &row, column, &row.values[column], old)
        })
        .collect();
    let mut row = row.with_value_extras(extras);

    handler.post_init_row(cx, view, position, &mut row);
    row
}

pub(crate) fn init_added_row<H: ViewHandler>(
    handler: &mut H,
    cx: &ViewContext,
    view: &mut H::View,
    id: AddedRowId,
    row: AddedRow,
    old: Option<OldExtras<H::Value, H::Row>>,
) -> AddedRowOf<H> {
    let (old_row, mut old_values) = split(old);

    let extra = handler.create_added_row(cx, view, id, &row, old_row);
    let row = row.with_extra(extra);

    let extras: Vec<H::Value> = (0..row.values.len())
        .map(|column| {
            let old = take_value(&mut old_values, column);
            handler.create_added_value(cx, view, id, &row, column, &row.values[column], old)
        })
        .collect();
    let mut row = row.with_value_extras(extras);

    handler.post_init_added_row(cx, view, id, &mut row);
    row
}

fn init_empty_row<H: ViewHandler>(
    handler: &mut H,
    cx: &ViewContext,
    view: &mut H::View,
    row: EmptyRow,
    old: Option<OldExtras<H::Value, H::Row>>,
) -> EmptyRowOf<H> {
    let (old_row, mut old_values) = split(old);

    let extra = handler.create_empty_row(cx, view, &row, old_row);
    let row = row.with_extra(extra);

    let extras: Vec<H::Value> = (0..row.values.len())
        .map(|column| {
            let old = take_value(&mut old_values, column);
            handler.create_empty_value(cx, view, &row, column, &row.values[column], old)
        })
        .collect();
    let mut row = row.with_value_extras(extras);

    handler.post_init_empty_row(cx, view, &mut row);
    row
}

/// Converts a result row and overlays pending deletes and edits on it.
fn build_existing_row(
    cx: &ViewContext,
    staging: &StagingSnapshot,
    puns: &mut PunResolver,
    position: RowPosition,
    row: ExecutedRow,
) -> ExistingRow {
    let main = cx.main_entity();
    let main_id = main.and(row.main_id);
    let deleted = match (main, main_id) {
        (Some(entity), Some(id)) => staging.is_deleted(entity, id),
        _ => false,
    };

    // Rows of an editable view without a main id are read-only.
    let bindable = main.is_none() || main_id.is_some();
    let domain = row
        .domain_id
        .and_then(|domain_id| cx.info.domains.get(&domain_id))
        .filter(|_| bindable);

    let mut raw_values = row.values.into_iter();
    let mut values = Vec::with_capacity(cx.info.columns.len());

    for (column, info) in cx.info.columns.iter().enumerate() {
        let ExecutedValue {
            value: json,
            pun,
            attributes,
        } = raw_values.next().unwrap_or_default();
        let mut value = CombinedValue::unbound(Value::from_json(&info.value_type, &json));
        value.attributes = attributes;

        let binding = domain.and_then(|domain| {
            let field = domain.get(&info.name)?;
            let id = row.entity_ids.as_ref()?.get(&field.id_column)?;
            Some((field, id))
        });

        let Some((field, entity_id)) = binding else {
            value.pun = pun.map(|pun| match pun {
                serde_json::Value::Null => Pun::Missing,
                pun => Pun::Label(json_text(&pun)),
            });
            values.push(value);
            continue;
        };

        let field_ref = match &entity_id.sub_entity {
            Some(sub_entity) => FieldRef::new(sub_entity.clone(), field.field_ref.name.clone()),
            None => field.field_ref.clone(),
        };
        value.info = Some(ValueInfo {
            field: field.field.clone(),
            field_ref,
            id: Some(entity_id.id),
        });
        value.pun = pun.map(|pun| server_pun(&pun, &value));
        value.snapshot_initial();

        if let Some(updated) = staging.updated_value(&field.field_ref, entity_id.id) {
            value.apply_update(updated);
            if let Some(column_field) = &field.field {
                let target = ValueRef::new(RowRef::Existing(position), column);
                puns.request(target, &mut value, &column_field.field_type);
            }
        }

        values.push(value);
    }

    ExistingRow {
        values,
        domain_id: row.domain_id,
        main_id,
        entity_ids: row.entity_ids,
        attributes: row.attributes,
        deleted,
        old_added_id: None,
        extra: (),
    }
}

/// Labels sent along with a stored value. A null label shows the value
/// itself.
fn server_pun(pun: &serde_json::Value, value: &CombinedValue) -> Pun {
    let label = match pun {
        serde_json::Value::Null => value.value.as_ref().map(Value::to_text).unwrap_or_default(),
        pun => json_text(pun),
    };
    Pun::Label(label)
}

fn json_text(json: &serde_json::Value) -> String {
    match json {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds an added row from the values staged for it. Columns not bound to
/// the main entity stay unset.
pub(crate) fn build_added_row(
    cx: &ViewContext,
    puns: &mut PunResolver,
    main: &EntityRef,
    id: AddedRowId,
    entry: &AddedEntry,
) -> AddedRow {
    let mut values = Vec::with_capacity(cx.info.columns.len());

    for (column, info) in cx.info.columns.iter().enumerate() {
        let mut value = CombinedValue::unbound(None);
        let Some(main_field) = &info.main_field else {
            values.push(value);
            continue;
        };

        let field = &main_field.field;
        value.info = Some(ValueInfo {
            field: Some(field.clone()),
            field_ref: main.field(&main_field.name),
            id: None,
        });

        match entry.values.get(&main_field.name) {
            Some(updated) => {
                value.apply_update(updated);
                let target = ValueRef::new(RowRef::Added(id), column);
                puns.request(target, &mut value, &field.field_type);
            }
            None => {
                value.value = field.is_nullable.then_some(Value::Null);
                if field.field_type.is_reference() {
                    value.pun = Some(Pun::Missing);
                }
            }
        }

        values.push(value);
    }

    AddedRow {
        values,
        deleted: false,
        new_id: None,
        extra: (),
    }
}

/// The template row, when the view allows inserts.
fn build_empty_row(cx: &ViewContext, puns: &mut PunResolver) -> Option<EmptyRow> {
    if !cx.allows_insert() {
        return None;
    }
    let main = cx.main_entity()?;
    let mut values = Vec::with_capacity(cx.info.columns.len());

    for (column, info) in cx.info.columns.iter().enumerate() {
        let mut value = CombinedValue::unbound(None);
        let Some(main_field) = &info.main_field else {
            values.push(value);
            continue;
        };

        let field = &main_field.field;
        let raw_default = cx
            .default_raw_values
            .get(&main_field.name)
            .cloned()
            .or_else(|| {
                cx.column_attribute(column, "default_value")
                    .map(Value::from_json_untyped)
            });

        value.value = match raw_default {
            Some(raw) => Value::from_raw(field, &raw).or_else(|| field.default_value()),
            None => field.default_value(),
        };
        value.info = Some(ValueInfo {
            field: Some(field.clone()),
            field_ref: main.field(&main_field.name),
            id: None,
        });
        puns.request(ValueRef::new(RowRef::New, column), &mut value, &field.field_type);

        values.push(value);
    }

    Some(EmptyRow { values, extra: () })
}

/// Entities whose metadata edits will need: the main entity, and when rows
/// were fetched, every entity a domain refers to.
fn prefetch_targets(info: &ResultViewInfo, has_rows: bool) -> Vec<EntityRef> {
    let mut targets: Vec<EntityRef> = info.main_entity_ref().into_iter().cloned().collect();
    if has_rows {
        for field in info.domains.values().flat_map(|domain| domain.values()) {
            if !targets.contains(&field.field_ref.entity) {
                targets.push(field.field_ref.entity.clone());
            }
        }
    }
    targets
}
