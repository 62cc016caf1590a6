//! Metadata describing a query result: entities, fields, columns and domains.

mod attributes;
pub use attributes::{
    AttributeName, AttributeType, AttributeTypes, AttributesMap, BoundMapping,
    BoundMappingEntry,
};

mod column;
pub use column::{ColumnField, MainField, ResultColumnInfo};

mod domain;
pub use domain::{Domain, DomainField, DomainId};

mod entity_ref;
pub use entity_ref::{EntityName, EntityRef, FieldName, FieldRef, SchemaName};

mod field_type;
pub use field_type::{FieldType, ValueType};

mod source;
pub use source::{ArgumentName, ViewArguments, ViewSource};

mod view_info;
pub use view_info::{ArgumentInfo, MainEntity, ResultViewInfo};
