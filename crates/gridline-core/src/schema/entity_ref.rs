use serde::{Deserialize, Serialize};
use std::fmt;

pub type SchemaName = String;
pub type EntityName = String;
pub type FieldName = String;

/// Fully qualified reference to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub schema: SchemaName,
    pub name: EntityName,
}

/// Fully qualified reference to a field of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub entity: EntityRef,
    pub name: FieldName,
}

impl EntityRef {
    pub fn new(schema: impl Into<SchemaName>, name: impl Into<EntityName>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    pub fn field(&self, name: impl Into<FieldName>) -> FieldRef {
        FieldRef {
            entity: self.clone(),
            name: name.into(),
        }
    }
}

impl FieldRef {
    pub fn new(entity: EntityRef, name: impl Into<FieldName>) -> Self {
        Self {
            entity,
            name: name.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.name)
    }
}
