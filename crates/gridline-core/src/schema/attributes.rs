use super::ValueType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type AttributeName = String;

/// Attribute values attached to a view, column, row or cell.
pub type AttributesMap = IndexMap<AttributeName, serde_json::Value>;

/// Declared attribute types, by attribute name.
pub type AttributeTypes = IndexMap<AttributeName, AttributeType>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeType {
    #[serde(rename = "type")]
    pub ty: ValueType,

    /// Present when the attribute value is computed from the cell value by a
    /// fixed lookup table.
    #[serde(default)]
    pub mapping: Option<BoundMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundMapping {
    pub entries: Vec<BoundMappingEntry>,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundMappingEntry {
    pub when: serde_json::Value,
    pub value: serde_json::Value,
}

impl AttributeType {
    pub fn new(ty: ValueType) -> Self {
        Self { ty, mapping: None }
    }
}
