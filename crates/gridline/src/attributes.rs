//! Attribute values computed from a cell value through a fixed lookup table.

use gridline_core::{
    schema::{ArgumentInfo, AttributeName, AttributeTypes, BoundMapping, ResultColumnInfo, ValueType},
    Value,
};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Attribute name → lookup table.
pub type BoundAttributesMap = IndexMap<AttributeName, ConvertedBoundMapping>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConvertedBoundMapping {
    /// Keyed by the text of the matched value.
    pub entries: HashMap<String, serde_json::Value>,
    pub default: Option<serde_json::Value>,
}

impl ConvertedBoundMapping {
    /// The attribute value for a cell holding `value`.
    pub fn get(&self, value: &Value) -> Option<&serde_json::Value> {
        self.entries
            .get(&value.to_text())
            .or(self.default.as_ref())
    }
}

pub(crate) fn column_mappings(column: &ResultColumnInfo) -> BoundAttributesMap {
    convert_all(&column.attribute_types)
        .chain(convert_all(&column.cell_attribute_types))
        .collect()
}

pub(crate) fn argument_mappings(argument: &ArgumentInfo) -> BoundAttributesMap {
    convert_all(&argument.attribute_types).collect()
}

fn convert_all(
    types: &AttributeTypes,
) -> impl Iterator<Item = (AttributeName, ConvertedBoundMapping)> + '_ {
    types.iter().filter_map(|(name, ty)| {
        let mapping = convert(&ty.ty, ty.mapping.as_ref()?)?;
        Some((name.clone(), mapping))
    })
}

/// Only scalars with an exact textual form can be matched.
fn convert(ty: &ValueType, mapping: &BoundMapping) -> Option<ConvertedBoundMapping> {
    match ty.scalar() {
        ValueType::String | ValueType::Bool | ValueType::Int | ValueType::Uuid => {}
        _ => return None,
    }

    let entries = mapping
        .entries
        .iter()
        .map(|entry| (key_text(&entry.when), entry.value.clone()))
        .collect();

    Some(ConvertedBoundMapping {
        entries,
        default: mapping.default.clone(),
    })
}

fn key_text(when: &serde_json::Value) -> String {
    match when {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
