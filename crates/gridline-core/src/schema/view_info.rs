use super::{
    ArgumentName, AttributeTypes, Domain, DomainId, EntityRef, ResultColumnInfo, ValueType,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Entity a view edits and inserts into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainEntity {
    pub entity: EntityRef,
    pub for_insert: bool,
}

/// Declared argument of a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentInfo {
    pub name: ArgumentName,
    pub arg_type: ValueType,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub attribute_types: AttributeTypes,
}

/// Static metadata of a query result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultViewInfo {
    #[serde(default)]
    pub attribute_types: AttributeTypes,

    #[serde(default)]
    pub row_attribute_types: AttributeTypes,

    #[serde(default)]
    pub arguments: Vec<ArgumentInfo>,

    #[serde(default)]
    pub main_entity: Option<MainEntity>,

    pub columns: Vec<ResultColumnInfo>,

    #[serde(default)]
    pub domains: IndexMap<DomainId, Domain>,
}

impl ResultViewInfo {
    pub fn main_entity_ref(&self) -> Option<&EntityRef> {
        self.main_entity.as_ref().map(|main| &main.entity)
    }

    /// Returns `true` when both results edit the same main entity.
    pub fn same_main_entity(&self, other: &ResultViewInfo) -> bool {
        match (self.main_entity_ref(), other.main_entity_ref()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}
