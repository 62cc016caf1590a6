//! Result sets as returned by a [`QueryProvider`](crate::provider::QueryProvider).

use crate::schema::{ArgumentName, AttributesMap, DomainId, EntityRef, ResultViewInfo};
use crate::RowId;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// A cell as sent by the server, before type conversion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutedValue {
    pub value: serde_json::Value,

    /// Display label. `Some(Null)` means the server punned the column but
    /// had no label for this value; `None` means the column is not punned.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub pun: Option<serde_json::Value>,

    #[serde(default)]
    pub attributes: Option<AttributesMap>,
}

/// Id of the row owning a value, as carried in a hidden id column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityId {
    pub id: RowId,

    /// The concrete child entity, when the field's entity is inherited.
    #[serde(default)]
    pub sub_entity: Option<EntityRef>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutedRow {
    pub values: Vec<ExecutedValue>,

    #[serde(default)]
    pub domain_id: Option<DomainId>,

    /// Id of the main entity row this result row displays.
    #[serde(default)]
    pub main_id: Option<RowId>,

    /// Id column name → owning row.
    #[serde(default)]
    pub entity_ids: Option<IndexMap<String, EntityId>>,

    #[serde(default)]
    pub attributes: Option<AttributesMap>,
}

/// Everything a single query execution returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewResult {
    pub info: ResultViewInfo,

    #[serde(default)]
    pub attributes: AttributesMap,

    #[serde(default)]
    pub column_attributes: Vec<AttributesMap>,

    #[serde(default)]
    pub argument_attributes: IndexMap<ArgumentName, AttributesMap>,

    /// `None` when only metadata was requested.
    #[serde(default)]
    pub rows: Option<Vec<ExecutedRow>>,
}

fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ExecutedValue {
    pub fn new(value: serde_json::Value) -> Self {
        Self {
            value,
            pun: None,
            attributes: None,
        }
    }

    pub fn with_pun(mut self, pun: serde_json::Value) -> Self {
        self.pun = Some(pun);
        self
    }
}

impl ExecutedRow {
    pub fn new(values: Vec<ExecutedValue>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }
}

impl ViewResult {
    pub fn new(info: ResultViewInfo, rows: Vec<ExecutedRow>) -> Self {
        let column_attributes = vec![AttributesMap::new(); info.columns.len()];
        Self {
            info,
            attributes: AttributesMap::new(),
            column_attributes,
            argument_attributes: IndexMap::new(),
            rows: Some(rows),
        }
    }
}
