use super::EntityRef;
use serde::{Deserialize, Serialize};

/// Declared type of an entity field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    Int,
    Decimal,
    String,
    Bool,
    Date,
    DateTime,
    Json,
    Uuid,

    /// One of a fixed set of strings.
    Enum { values: Vec<String> },

    /// Integer id of a row of another entity.
    Reference { entity: EntityRef },

    /// A list of a single scalar type.
    Array { subtype: Box<FieldType> },
}

/// Type of the values a result column carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueType {
    Int,
    Decimal,
    String,
    Bool,
    Date,
    DateTime,
    Json,
    Uuid,
    Array { subtype: Box<ValueType> },
}

impl FieldType {
    pub fn array(subtype: FieldType) -> Self {
        Self::Array {
            subtype: Box::new(subtype),
        }
    }

    pub fn reference(entity: EntityRef) -> Self {
        Self::Reference { entity }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference { .. })
    }

    /// The entity targeted by a reference field.
    pub fn referenced_entity(&self) -> Option<&EntityRef> {
        match self {
            Self::Reference { entity } => Some(entity),
            _ => None,
        }
    }

    /// The column value type a field of this type is carried as.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Int | Self::Reference { .. } => ValueType::Int,
            Self::Decimal => ValueType::Decimal,
            Self::String | Self::Enum { .. } => ValueType::String,
            Self::Bool => ValueType::Bool,
            Self::Date => ValueType::Date,
            Self::DateTime => ValueType::DateTime,
            Self::Json => ValueType::Json,
            Self::Uuid => ValueType::Uuid,
            Self::Array { subtype } => ValueType::array(subtype.value_type()),
        }
    }
}

impl ValueType {
    pub fn array(subtype: ValueType) -> Self {
        Self::Array {
            subtype: Box::new(subtype),
        }
    }

    /// The element type for arrays, the type itself otherwise.
    pub fn scalar(&self) -> &ValueType {
        match self {
            Self::Array { subtype } => subtype,
            ty => ty,
        }
    }
}
