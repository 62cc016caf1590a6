//! Snapshot of locally pending changes, as recorded by the staging store.
//!
//! The staging store owns this data; views only read it.

use crate::schema::{EntityRef, FieldName, FieldRef};
use crate::{AddedRowId, RowId, Value};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// A pending edit of a single field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdatedValue {
    /// The validated value; `None` when the input did not pass validation.
    pub value: Option<Value>,

    /// What the user actually entered, when it differs from `value`.
    pub raw_value: Option<Value>,

    /// Set once submitting this edit failed.
    pub errored_once: bool,
}

/// Values recorded for a locally added row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddedEntry {
    pub values: IndexMap<FieldName, UpdatedValue>,
}

/// Pending changes of one entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityChanges {
    pub added: IndexMap<AddedRowId, AddedEntry>,
    pub updated: HashMap<RowId, IndexMap<FieldName, UpdatedValue>>,
    pub deleted: HashSet<RowId>,
}

#[derive(Debug, Clone, Default)]
pub struct StagingSnapshot {
    changes: HashMap<EntityRef, EntityChanges>,
}

impl UpdatedValue {
    /// An edit with an already validated value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            raw_value: None,
            errored_once: false,
        }
    }

    /// An edit carrying both the entered text and its validation result.
    pub fn with_raw(value: Option<Value>, raw: impl Into<Value>) -> Self {
        Self {
            value,
            raw_value: Some(raw.into()),
            errored_once: false,
        }
    }
}

impl AddedEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, field: impl Into<FieldName>, value: UpdatedValue) -> Self {
        self.values.insert(field.into(), value);
        self
    }
}

impl StagingSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes_for_entity(&self, entity: &EntityRef) -> Option<&EntityChanges> {
        self.changes.get(entity)
    }

    /// Mutable access for the owning store; creates the entity on demand.
    pub fn entity_mut(&mut self, entity: &EntityRef) -> &mut EntityChanges {
        self.changes.entry(entity.clone()).or_default()
    }

    pub fn is_deleted(&self, entity: &EntityRef, id: RowId) -> bool {
        self.changes_for_entity(entity)
            .is_some_and(|changes| changes.deleted.contains(&id))
    }

    pub fn updated_value(&self, field: &FieldRef, id: RowId) -> Option<&UpdatedValue> {
        self.changes_for_entity(&field.entity)?
            .updated
            .get(&id)?
            .get(&field.name)
    }

    pub fn added_entry(&self, entity: &EntityRef, id: AddedRowId) -> Option<&AddedEntry> {
        self.changes_for_entity(entity)?.added.get(&id)
    }

    pub fn add_entry(&mut self, entity: &EntityRef, id: AddedRowId, entry: AddedEntry) {
        self.entity_mut(entity).added.insert(id, entry);
    }

    pub fn update_field(&mut self, field: &FieldRef, id: RowId, value: UpdatedValue) {
        self.entity_mut(&field.entity)
            .updated
            .entry(id)
            .or_default()
            .insert(field.name.clone(), value);
    }

    pub fn delete_entry(&mut self, entity: &EntityRef, id: RowId) {
        self.entity_mut(entity).deleted.insert(id);
    }

    /// Drops an added entry, as happens when it is discarded or committed.
    pub fn remove_added(&mut self, entity: &EntityRef, id: AddedRowId) -> Option<AddedEntry> {
        self.changes.get_mut(entity)?.added.shift_remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_on_unknown_entities_are_empty() {
        let staging = StagingSnapshot::new();
        let entity = EntityRef::new("public", "people");

        assert!(!staging.is_deleted(&entity, RowId(1)));
        assert!(staging.updated_value(&entity.field("name"), RowId(1)).is_none());
        assert!(staging.added_entry(&entity, AddedRowId(1)).is_none());
    }

    #[test]
    fn records_pending_changes() {
        let mut staging = StagingSnapshot::new();
        let entity = EntityRef::new("public", "people");
        let name = entity.field("name");

        staging.update_field(&name, RowId(7), UpdatedValue::new("Alicia"));
        staging.delete_entry(&entity, RowId(8));
        staging.add_entry(
            &entity,
            AddedRowId(101),
            AddedEntry::new().value("name", UpdatedValue::new("Bob")),
        );

        assert_eq!(
            staging.updated_value(&name, RowId(7)).and_then(|v| v.value.clone()),
            Some(Value::from("Alicia"))
        );
        assert!(staging.is_deleted(&entity, RowId(8)));
        assert!(staging.added_entry(&entity, AddedRowId(101)).is_some());

        staging.remove_added(&entity, AddedRowId(101));
        assert!(staging.added_entry(&entity, AddedRowId(101)).is_none());
    }
}
