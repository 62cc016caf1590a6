#![allow(dead_code)]

use gridline::{
    async_trait,
    provider::{
        CachedEntries, Chunk, Entries, EntriesRef, EntityInfo, EntityProvider, LabelCache,
        QueryProvider,
    },
    refs::{ColumnPosition, RowPosition},
    result::{EntityId, ExecutedRow, ExecutedValue, ViewResult},
    schema::{
        ColumnField, DomainField, EntityRef, FieldRef, FieldType, MainEntity, ResultColumnInfo,
        ResultViewInfo, ValueType, ViewArguments,
    },
    AddedRow, AddedRowId, CombinedValue, EmptyRow, Error, ExistingRow, ReconcileInput, Result,
    RowId, StagingSnapshot, ValueUpdate, ViewContext, ViewHandler,
};
use indexmap::IndexMap;
use serde_json::json;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

pub const NAME: ColumnPosition = 0;
pub const ITEM: ColumnPosition = 1;
pub const TOTAL: ColumnPosition = 2;

pub fn people() -> EntityRef {
    EntityRef::new("public", "people")
}

pub fn items() -> EntityRef {
    EntityRef::new("public", "items")
}

pub fn name_field() -> FieldRef {
    people().field("name")
}

pub fn item_field() -> FieldRef {
    people().field("item")
}

pub fn people_args() -> ViewArguments {
    ViewArguments::named("public", "people_list")
}

/// `name`, `item` and `total` over `public.people`; the first two are
/// editable.
pub fn people_info() -> ResultViewInfo {
    let name = ColumnField::new(FieldType::String);
    let item = ColumnField::new(FieldType::reference(items())).nullable();

    let domain = IndexMap::from([
        (
            "name".to_string(),
            DomainField {
                field_ref: name_field(),
                field: Some(name.clone()),
                id_column: "__id".to_string(),
            },
        ),
        (
            "item".to_string(),
            DomainField {
                field_ref: item_field(),
                field: Some(item.clone()),
                id_column: "__id".to_string(),
            },
        ),
    ]);

    ResultViewInfo {
        main_entity: Some(MainEntity {
            entity: people(),
            for_insert: true,
        }),
        columns: vec![
            ResultColumnInfo::new("name", ValueType::String).main_field("name", name),
            ResultColumnInfo::new("item", ValueType::Int).main_field("item", item),
            ResultColumnInfo::new("total", ValueType::Int),
        ],
        domains: IndexMap::from([(0, domain)]),
        ..ResultViewInfo::default()
    }
}

pub fn person(id: i64, name: &str, item: Option<i64>) -> ExecutedRow {
    ExecutedRow {
        values: vec![
            ExecutedValue::new(json!(name)),
            ExecutedValue::new(json!(item)),
            ExecutedValue::new(json!(id * 10)),
        ],
        domain_id: Some(0),
        main_id: Some(RowId(id)),
        entity_ids: Some(IndexMap::from([(
            "__id".to_string(),
            EntityId {
                id: RowId(id),
                sub_entity: None,
            },
        )])),
        attributes: None,
    }
}

pub fn people_result(rows: Vec<ExecutedRow>) -> ViewResult {
    ViewResult::new(people_info(), rows)
}

pub fn people_input(staging: &StagingSnapshot, rows: Vec<ExecutedRow>) -> ReconcileInput<'_> {
    ReconcileInput::new(people_args(), people_result(rows), staging)
}

/// Serves a fixed result, cut to the requested chunk.
#[derive(Debug)]
pub struct MemoryQuery {
    pub result: Mutex<ViewResult>,
    pub chunks: Mutex<Vec<Chunk>>,
    pub fail: Mutex<bool>,
}

impl MemoryQuery {
    pub fn new(result: ViewResult) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(result),
            chunks: Mutex::new(vec![]),
            fail: Mutex::new(false),
        })
    }
}

#[async_trait]
impl QueryProvider for MemoryQuery {
    async fn fetch_result(&self, _args: &ViewArguments, chunk: Chunk) -> Result<ViewResult> {
        self.chunks.lock().unwrap().push(chunk);
        if *self.fail.lock().unwrap() {
            return Err(Error::provider(std::io::Error::other("503 service unavailable")));
        }

        let mut result = self.result.lock().unwrap().clone();
        if let Some(rows) = &mut result.rows {
            *rows = rows
                .drain(..)
                .skip(chunk.offset)
                .take(chunk.limit.unwrap_or(usize::MAX))
                .collect();
        }
        Ok(result)
    }
}

/// Label cache with a locally held part and a "remote" part reached
/// through lookups.
#[derive(Debug, Default)]
pub struct MemoryLabels {
    pub cached: Mutex<HashMap<EntriesRef, CachedEntries>>,
    pub remote: Mutex<Entries>,
    pub fail: Mutex<bool>,
    pub lookups: Mutex<Vec<(EntriesRef, Vec<RowId>)>>,
}

impl MemoryLabels {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_remote(entries: &[(i64, &str)]) -> Arc<Self> {
        let labels = Self::default();
        *labels.remote.lock().unwrap() = entries
            .iter()
            .map(|(id, label)| (RowId(*id), label.to_string()))
            .collect();
        Arc::new(labels)
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

#[async_trait]
impl LabelCache for MemoryLabels {
    fn get_entries(&self, scope: &EntriesRef) -> Option<Arc<CachedEntries>> {
        self.cached.lock().unwrap().get(scope).cloned().map(Arc::new)
    }

    async fn resolve_labels(&self, scope: &EntriesRef, ids: &[RowId]) -> Result<Entries> {
        self.lookups
            .lock()
            .unwrap()
            .push((scope.clone(), ids.to_vec()));
        if *self.fail.lock().unwrap() {
            return Err(Error::lookup(std::io::Error::other("connection reset")));
        }

        let remote = self.remote.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| Some((*id, remote.get(id)?.clone())))
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct MemoryEntities {
    pub requested: Mutex<Vec<EntityRef>>,
}

#[async_trait]
impl EntityProvider for MemoryEntities {
    async fn get_entity(&self, entity: &EntityRef) -> Result<Arc<EntityInfo>> {
        self.requested.lock().unwrap().push(entity.clone());
        if *entity == people() {
            Ok(Arc::new(EntityInfo::new(people())))
        } else {
            Err(Error::unknown_entity(entity))
        }
    }
}

/// Consumer state with a serial number, so tests can tell whether state was
/// carried over or created afresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tracked(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CreateView { carried: bool },
    PostInitView,
    CreateRow { position: RowPosition, carried: bool },
    CreateValue { position: RowPosition, column: ColumnPosition, carried: bool },
    PostInitRow { position: RowPosition },
    UpdateValue { position: RowPosition, column: ColumnPosition, update: ValueUpdate },
    DeleteRow { position: RowPosition },
    UndeleteRow { position: RowPosition },
    CreateAddedRow { id: AddedRowId, carried: bool },
    CreateAddedValue { id: AddedRowId, column: ColumnPosition, carried: bool },
    PostInitAddedRow { id: AddedRowId },
    UpdateAddedValue { id: AddedRowId, column: ColumnPosition, update: ValueUpdate },
    DeleteAddedRow { id: AddedRowId },
    UndeleteAddedRow { id: AddedRowId },
    CommitAddedRow { id: AddedRowId },
    CreateEmptyRow { carried: bool },
    CreateEmptyValue { column: ColumnPosition, carried: bool },
    PostInitEmptyRow,
    UpdateEmptyValue { column: ColumnPosition, update: ValueUpdate },
}

/// Handler that logs every callback.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
    next: u64,
}

impl Recorder {
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn track(&mut self, old: Option<Tracked>) -> Tracked {
        old.unwrap_or_else(|| {
            self.next += 1;
            Tracked(self.next)
        })
    }
}

impl ViewHandler for Recorder {
    type Value = Tracked;
    type Row = Tracked;
    type View = Tracked;

    fn create_view(&mut self, _cx: &ViewContext, old: Option<&Tracked>) -> Tracked {
        self.events.push(Event::CreateView {
            carried: old.is_some(),
        });
        self.track(old.copied())
    }

    fn post_init_view(&mut self, _cx: &ViewContext, _view: &mut Tracked) {
        self.events.push(Event::PostInitView);
    }

    fn create_row(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        position: RowPosition,
        _row: &ExistingRow,
        old: Option<Tracked>,
    ) -> Tracked {
        self.events.push(Event::CreateRow {
            position,
            carried: old.is_some(),
        });
        self.track(old)
    }

    fn create_value(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        position: RowPosition,
        _row: &ExistingRow<(), Tracked>,
        column: ColumnPosition,
        _value: &CombinedValue,
        old: Option<Tracked>,
    ) -> Tracked {
        self.events.push(Event::CreateValue {
            position,
            column,
            carried: old.is_some(),
        });
        self.track(old)
    }

    fn post_init_row(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        position: RowPosition,
        _row: &mut ExistingRow<Tracked, Tracked>,
    ) {
        self.events.push(Event::PostInitRow { position });
    }

    fn update_value(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        position: RowPosition,
        _row: &mut ExistingRow<Tracked, Tracked>,
        column: ColumnPosition,
        update: &ValueUpdate,
    ) {
        self.events.push(Event::UpdateValue {
            position,
            column,
            update: update.clone(),
        });
    }

    fn delete_row(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        position: RowPosition,
        _row: &mut ExistingRow<Tracked, Tracked>,
    ) {
        self.events.push(Event::DeleteRow { position });
    }

    fn undelete_row(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        position: RowPosition,
        _row: &mut ExistingRow<Tracked, Tracked>,
    ) {
        self.events.push(Event::UndeleteRow { position });
    }

    fn create_added_row(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        id: AddedRowId,
        _row: &AddedRow,
        old: Option<Tracked>,
    ) -> Tracked {
        self.events.push(Event::CreateAddedRow {
            id,
            carried: old.is_some(),
        });
        self.track(old)
    }

    fn create_added_value(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        id: AddedRowId,
        _row: &AddedRow<(), Tracked>,
        column: ColumnPosition,
        _value: &CombinedValue,
        old: Option<Tracked>,
    ) -> Tracked {
        self.events.push(Event::CreateAddedValue {
            id,
            column,
            carried: old.is_some(),
        });
        self.track(old)
    }

    fn post_init_added_row(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        id: AddedRowId,
        _row: &mut AddedRow<Tracked, Tracked>,
    ) {
        self.events.push(Event::PostInitAddedRow { id });
    }

    fn update_added_value(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        id: AddedRowId,
        _row: &mut AddedRow<Tracked, Tracked>,
        column: ColumnPosition,
        update: &ValueUpdate,
    ) {
        self.events.push(Event::UpdateAddedValue {
            id,
            column,
            update: update.clone(),
        });
    }

    fn delete_added_row(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        id: AddedRowId,
        _row: &mut AddedRow<Tracked, Tracked>,
    ) {
        self.events.push(Event::DeleteAddedRow { id });
    }

    fn undelete_added_row(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        id: AddedRowId,
        _row: &mut AddedRow<Tracked, Tracked>,
    ) {
        self.events.push(Event::UndeleteAddedRow { id });
    }

    fn commit_added_row(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        id: AddedRowId,
        _row: &mut AddedRow<Tracked, Tracked>,
    ) {
        self.events.push(Event::CommitAddedRow { id });
    }

    fn create_empty_row(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        _row: &EmptyRow,
        old: Option<Tracked>,
    ) -> Tracked {
        self.events.push(Event::CreateEmptyRow {
            carried: old.is_some(),
        });
        self.track(old)
    }

    fn create_empty_value(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        _row: &EmptyRow<(), Tracked>,
        column: ColumnPosition,
        _value: &CombinedValue,
        old: Option<Tracked>,
    ) -> Tracked {
        self.events.push(Event::CreateEmptyValue {
            column,
            carried: old.is_some(),
        });
        self.track(old)
    }

    fn post_init_empty_row(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        _row: &mut EmptyRow<Tracked, Tracked>,
    ) {
        self.events.push(Event::PostInitEmptyRow);
    }

    fn update_empty_value(
        &mut self,
        _cx: &ViewContext,
        _view: &mut Tracked,
        _row: &mut EmptyRow<Tracked, Tracked>,
        column: ColumnPosition,
        update: &ValueUpdate,
    ) {
        self.events.push(Event::UpdateEmptyValue {
            column,
            update: update.clone(),
        });
    }
}
