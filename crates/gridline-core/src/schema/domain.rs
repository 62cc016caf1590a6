use super::{ColumnField, FieldRef};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Selects which domain of a [`ResultViewInfo`](super::ResultViewInfo)
/// describes the provenance of a row's values.
pub type DomainId = u32;

/// Column name → where that column's value comes from.
pub type Domain = IndexMap<String, DomainField>;

/// Provenance of a column's value within a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainField {
    #[serde(rename = "ref")]
    pub field_ref: FieldRef,

    /// Missing when the value is computed rather than stored.
    #[serde(default)]
    pub field: Option<ColumnField>,

    /// Name of the hidden column carrying the id of the row owning the field.
    pub id_column: String,
}
