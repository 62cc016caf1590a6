use crate::view::ExistingRow;

use gridline_core::{refs::CommittedRowRef, RowId};
use std::collections::HashMap;

/// Main entity row id → rows representing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MainRowMapping {
    rows: HashMap<RowId, Vec<CommittedRowRef>>,
}

impl MainRowMapping {
    /// Covers existing rows only; committed added rows are inserted later.
    pub(crate) fn build<V, R>(rows: &[ExistingRow<V, R>]) -> Self {
        let mut mapping = Self::default();
        for (position, row) in rows.iter().enumerate() {
            if let Some(id) = row.main_id {
                mapping.insert(id, CommittedRowRef::Existing(position));
            }
        }
        mapping
    }

    pub(crate) fn insert(&mut self, id: RowId, row: CommittedRowRef) {
        self.rows.entry(id).or_default().push(row);
    }

    /// Removes `row` from the entry of `id`, returning whether it was there.
    pub(crate) fn remove(&mut self, id: RowId, row: CommittedRowRef) -> bool {
        let Some(refs) = self.rows.get_mut(&id) else {
            return false;
        };
        let before = refs.len();
        refs.retain(|r| *r != row);
        let removed = refs.len() != before;
        if refs.is_empty() {
            self.rows.remove(&id);
        }
        removed
    }

    pub fn get(&self, id: RowId) -> &[CommittedRowRef] {
        self.rows.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.rows.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridline_core::AddedRowId;

    #[test]
    fn insert_and_remove() {
        let mut mapping = MainRowMapping::default();
        mapping.insert(RowId(7), CommittedRowRef::Existing(0));
        mapping.insert(RowId(7), CommittedRowRef::Added(AddedRowId(1)));

        assert_eq!(mapping.get(RowId(7)).len(), 2);
        assert!(mapping.remove(RowId(7), CommittedRowRef::Added(AddedRowId(1))));
        assert!(!mapping.remove(RowId(7), CommittedRowRef::Added(AddedRowId(1))));
        assert!(mapping.remove(RowId(7), CommittedRowRef::Existing(0)));
        assert!(!mapping.contains(RowId(7)));
        assert!(mapping.get(RowId(8)).is_empty());
    }
}
