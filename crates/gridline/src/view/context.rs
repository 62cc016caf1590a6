use crate::attributes::{self, BoundAttributesMap};

use gridline_core::{
    result::ViewResult,
    schema::{
        ArgumentInfo, ArgumentName, AttributesMap, EntityRef, FieldName, ResultViewInfo,
        SchemaName, ViewArguments,
    },
    Value,
};
use indexmap::IndexMap;

/// The part of a view that does not change between mutations. Handed to every
/// handler callback.
#[derive(Debug, Clone)]
pub struct ViewContext {
    pub args: ViewArguments,

    /// Schema of a named view; `None` for anonymous queries.
    pub home_schema: Option<SchemaName>,

    pub info: ResultViewInfo,

    pub arguments_map: IndexMap<ArgumentName, ArgumentInfo>,

    pub attributes: AttributesMap,

    /// One entry per column.
    pub column_attributes: Vec<AttributesMap>,

    pub argument_attributes: IndexMap<ArgumentName, AttributesMap>,

    /// One entry per column, covering column and cell attributes.
    pub column_attribute_mappings: Vec<BoundAttributesMap>,

    pub argument_attribute_mappings: IndexMap<ArgumentName, BoundAttributesMap>,

    /// Raw values the template row starts from, by main entity field.
    pub default_raw_values: IndexMap<FieldName, Value>,

    pub row_load_state: RowLoadState,
}

/// Paging progress of a view.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RowLoadState {
    /// Rows requested on top of those already fetched.
    pub per_fetch: usize,

    pub fetched_row_count: usize,

    /// No more rows are available.
    pub complete: bool,
}

impl ViewContext {
    pub(crate) fn new(
        args: ViewArguments,
        result: &mut ViewResult,
        default_raw_values: IndexMap<FieldName, Value>,
        row_load_state: RowLoadState,
    ) -> Self {
        let mut info = std::mem::take(&mut result.info);
        let attributes = std::mem::take(&mut result.attributes);

        if is_truthy(attributes.get("disable_insert")) {
            if let Some(main) = &mut info.main_entity {
                main.for_insert = false;
            }
        }

        let mut column_attributes = std::mem::take(&mut result.column_attributes);
        column_attributes.resize_with(info.columns.len(), AttributesMap::new);

        let arguments_map = info
            .arguments
            .iter()
            .map(|arg| (arg.name.clone(), arg.clone()))
            .collect();

        let column_attribute_mappings = info
            .columns
            .iter()
            .map(attributes::column_mappings)
            .collect();

        let argument_attribute_mappings = info
            .arguments
            .iter()
            .map(|arg| (arg.name.clone(), attributes::argument_mappings(arg)))
            .collect();

        Self {
            home_schema: args.source.home_schema().map(str::to_string),
            args,
            info,
            arguments_map,
            attributes,
            column_attributes,
            argument_attributes: std::mem::take(&mut result.argument_attributes),
            column_attribute_mappings,
            argument_attribute_mappings,
            default_raw_values,
            row_load_state,
        }
    }

    pub fn main_entity(&self) -> Option<&EntityRef> {
        self.info.main_entity_ref()
    }

    /// Returns `true` when new rows can be inserted through this view.
    pub fn allows_insert(&self) -> bool {
        self.info
            .main_entity
            .as_ref()
            .is_some_and(|main| main.for_insert)
    }

    /// Looks an attribute up on the column first, then on the view.
    pub fn column_attribute(&self, column: usize, name: &str) -> Option<&serde_json::Value> {
        self.column_attributes
            .get(column)
            .and_then(|attrs| attrs.get(name))
            .or_else(|| self.attributes.get(name))
    }
}

impl RowLoadState {
    pub fn new(per_fetch: usize) -> Self {
        Self {
            per_fetch,
            fetched_row_count: 0,
            complete: false,
        }
    }
}

impl Default for RowLoadState {
    fn default() -> Self {
        Self::new(crate::loader::DEFAULT_PER_FETCH)
    }
}

fn is_truthy(value: Option<&serde_json::Value>) -> bool {
    use serde_json::Value as Json;

    match value {
        None | Some(Json::Null) => false,
        Some(Json::Bool(b)) => *b,
        Some(Json::Number(n)) => n.as_f64() != Some(0.0),
        Some(Json::String(s)) => !s.is_empty(),
        Some(Json::Array(_) | Json::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridline_core::schema::{MainEntity, ResultViewInfo};
    use serde_json::json;

    fn result_with_main_entity() -> ViewResult {
        let info = ResultViewInfo {
            main_entity: Some(MainEntity {
                entity: EntityRef::new("public", "people"),
                for_insert: true,
            }),
            ..ResultViewInfo::default()
        };
        ViewResult::new(info, vec![])
    }

    #[test]
    fn disable_insert_turns_off_inserts() {
        let mut result = result_with_main_entity();
        result.attributes.insert("disable_insert".into(), json!(true));

        let cx = ViewContext::new(
            ViewArguments::named("public", "people_list"),
            &mut result,
            IndexMap::new(),
            RowLoadState::default(),
        );

        assert!(!cx.allows_insert());
        assert_eq!(cx.home_schema.as_deref(), Some("public"));
    }

    #[test]
    fn anonymous_views_have_no_home_schema() {
        let mut result = result_with_main_entity();
        let cx = ViewContext::new(
            ViewArguments::anonymous("SELECT 1"),
            &mut result,
            IndexMap::new(),
            RowLoadState::default(),
        );

        assert!(cx.allows_insert());
        assert_eq!(cx.home_schema, None);
    }

    #[test]
    fn column_attributes_fall_back_to_view() {
        let mut result = result_with_main_entity();
        result.attributes.insert("default_value".into(), json!("view"));
        result.column_attributes = vec![AttributesMap::new()];
        result.info.columns = vec![gridline_core::schema::ResultColumnInfo::new(
            "name",
            gridline_core::schema::ValueType::String,
        )];
        result.column_attributes[0].insert("default_value".into(), json!("column"));

        let cx = ViewContext::new(
            ViewArguments::anonymous("SELECT name FROM people"),
            &mut result,
            IndexMap::new(),
            RowLoadState::default(),
        );

        assert_eq!(cx.column_attribute(0, "default_value"), Some(&json!("column")));
        assert_eq!(cx.column_attribute(5, "default_value"), Some(&json!("view")));
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(is_truthy(Some(&json!("yes"))));
        assert!(is_truthy(Some(&json!(1))));
    }
}
