use crate::view::ExistingRow;

use gridline_core::{
    refs::{CommittedRowRef, CommittedValueRef},
    schema::{EntityRef, FieldName, FieldRef},
    RowId,
};
use std::collections::HashMap;

/// Stored field of a stored row → cells showing its value.
///
/// A row can show up more than once in a result (joins), so every entry is a
/// list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateMapping {
    entities: HashMap<EntityRef, HashMap<RowId, HashMap<FieldName, Vec<CommittedValueRef>>>>,
}

impl UpdateMapping {
    /// Covers existing rows only; committed added rows are inserted later.
    pub(crate) fn build<V, R>(rows: &[ExistingRow<V, R>]) -> Self {
        let mut mapping = Self::default();
        for (position, row) in rows.iter().enumerate() {
            for (column, value) in row.values.iter().enumerate() {
                let Some(info) = &value.info else { continue };
                let Some(id) = info.id else { continue };
                mapping.insert(
                    &info.field_ref,
                    id,
                    CommittedValueRef::new(CommittedRowRef::Existing(position), column),
                );
            }
        }
        mapping
    }

    pub(crate) fn insert(&mut self, field: &FieldRef, id: RowId, value: CommittedValueRef) {
        self.entities
            .entry(field.entity.clone())
            .or_default()
            .entry(id)
            .or_default()
            .entry(field.name.clone())
            .or_default()
            .push(value);
    }

    pub(crate) fn remove(&mut self, field: &FieldRef, id: RowId, value: CommittedValueRef) {
        let Some(rows) = self.entities.get_mut(&field.entity) else {
            return;
        };
        let Some(fields) = rows.get_mut(&id) else {
            return;
        };
        if let Some(refs) = fields.get_mut(&field.name) {
            refs.retain(|r| *r != value);
            if refs.is_empty() {
                fields.remove(&field.name);
            }
        }
        if fields.is_empty() {
            rows.remove(&id);
        }
    }

    pub fn get(&self, field: &FieldRef, id: RowId) -> &[CommittedValueRef] {
        self.entities
            .get(&field.entity)
            .and_then(|rows| rows.get(&id))
            .and_then(|fields| fields.get(&field.name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridline_core::AddedRowId;

    #[test]
    fn lookups_create_nothing() {
        let mapping = UpdateMapping::default();
        let name = EntityRef::new("public", "people").field("name");

        assert!(mapping.get(&name, RowId(7)).is_empty());
    }

    #[test]
    fn keeps_every_cell_of_a_field() {
        let mut mapping = UpdateMapping::default();
        let name = EntityRef::new("public", "people").field("name");
        let first = CommittedValueRef::new(CommittedRowRef::Existing(0), 1);
        let second = CommittedValueRef::new(CommittedRowRef::Existing(3), 1);
        let added = CommittedValueRef::new(CommittedRowRef::Added(AddedRowId(2)), 1);

        mapping.insert(&name, RowId(7), first);
        mapping.insert(&name, RowId(7), second);
        mapping.insert(&name, RowId(7), added);
        assert_eq!(mapping.get(&name, RowId(7)), &[first, second, added]);

        mapping.remove(&name, RowId(7), added);
        assert_eq!(mapping.get(&name, RowId(7)), &[first, second]);
    }
}
