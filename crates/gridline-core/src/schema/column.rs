use super::{AttributeTypes, FieldName, FieldType, ValueType};
use crate::Value;
use serde::{Deserialize, Serialize};

/// Descriptor of an entity field as seen from a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnField {
    pub field_type: FieldType,

    /// Default as sent by the server; see [`ColumnField::default_value`].
    #[serde(default)]
    pub default: Option<serde_json::Value>,

    pub is_nullable: bool,

    #[serde(default)]
    pub is_immutable: bool,
}

/// A column bound to a field of the view's main entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainField {
    pub name: FieldName,
    pub field: ColumnField,
}

/// Static metadata of one result column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultColumnInfo {
    pub name: String,

    pub value_type: ValueType,

    /// Type of the display label, when the column is punned.
    #[serde(default)]
    pub pun_type: Option<ValueType>,

    /// Set when the column is editable through the main entity.
    #[serde(default)]
    pub main_field: Option<MainField>,

    #[serde(default)]
    pub attribute_types: AttributeTypes,

    #[serde(default)]
    pub cell_attribute_types: AttributeTypes,
}

impl ColumnField {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            default: None,
            is_nullable: false,
            is_immutable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }

    /// The field default in canonical form. Nullable fields without a declared
    /// default default to null; other fields have no default.
    pub fn default_value(&self) -> Option<Value> {
        match &self.default {
            Some(json) => Value::from_json(&self.field_type.value_type(), json),
            None if self.is_nullable => Some(Value::Null),
            None => None,
        }
    }
}

impl ResultColumnInfo {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            pun_type: None,
            main_field: None,
            attribute_types: AttributeTypes::new(),
            cell_attribute_types: AttributeTypes::new(),
        }
    }

    /// Binds the column to a field of the main entity.
    pub fn main_field(mut self, name: impl Into<FieldName>, field: ColumnField) -> Self {
        if field.field_type.is_reference() {
            self.pun_type.get_or_insert(ValueType::String);
        }
        self.main_field = Some(MainField {
            name: name.into(),
            field,
        });
        self
    }
}
