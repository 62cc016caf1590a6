use gridline_core::{
    refs::ColumnPosition,
    schema::{FieldName, ResultViewInfo},
};
use indexmap::IndexMap;

/// Main entity field → columns showing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MainColumnMapping {
    columns: IndexMap<FieldName, Vec<ColumnPosition>>,
}

impl MainColumnMapping {
    pub(crate) fn build(info: &ResultViewInfo) -> Self {
        let mut mapping = Self::default();
        if info.main_entity.is_none() {
            return mapping;
        }

        for (column, info) in info.columns.iter().enumerate() {
            if let Some(main_field) = &info.main_field {
                mapping.insert(main_field.name.clone(), column);
            }
        }
        mapping
    }

    pub(crate) fn insert(&mut self, field: FieldName, column: ColumnPosition) {
        self.columns.entry(field).or_default().push(column);
    }

    pub fn get(&self, field: &str) -> &[ColumnPosition] {
        self.columns.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &[ColumnPosition])> {
        self.columns
            .iter()
            .map(|(field, columns)| (field, columns.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridline_core::schema::{
        ColumnField, EntityRef, FieldType, MainEntity, ResultColumnInfo, ValueType,
    };

    #[test]
    fn groups_columns_by_field() {
        let name = ColumnField::new(FieldType::String);
        let info = ResultViewInfo {
            main_entity: Some(MainEntity {
                entity: EntityRef::new("public", "people"),
                for_insert: true,
            }),
            columns: vec![
                ResultColumnInfo::new("name", ValueType::String).main_field("name", name.clone()),
                ResultColumnInfo::new("total", ValueType::Int),
                ResultColumnInfo::new("name_again", ValueType::String).main_field("name", name),
            ],
            ..ResultViewInfo::default()
        };

        let mapping = MainColumnMapping::build(&info);

        assert_eq!(mapping.get("name"), &[0, 2]);
        assert!(mapping.get("total").is_empty());
    }

    #[test]
    fn empty_without_main_entity() {
        let info = ResultViewInfo {
            columns: vec![ResultColumnInfo::new("name", ValueType::String)
                .main_field("name", ColumnField::new(FieldType::String))],
            ..ResultViewInfo::default()
        };

        assert!(MainColumnMapping::build(&info).get("name").is_empty());
    }
}
