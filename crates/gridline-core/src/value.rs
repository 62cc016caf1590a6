mod json;
mod raw;
mod text;

pub use text::{DATETIME_FORMAT, DATE_FORMAT};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// A value in canonical in-memory form.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer; also carries reference ids
    Int(i64),

    /// Decimal number
    Decimal(f64),

    /// String value
    String(String),

    /// Calendar date
    Date(NaiveDate),

    /// Point in time
    DateTime(DateTime<Utc>),

    /// UUID value
    Uuid(Uuid),

    /// Free-form structured data
    Json(serde_json::Value),

    /// A list of values of the same type
    List(Vec<Value>),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::Int(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::Int(src.into())
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::Decimal(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(src: NaiveDate) -> Self {
        Self::Date(src)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(src: DateTime<Utc>) -> Self {
        Self::DateTime(src)
    }
}

impl From<Uuid> for Value {
    fn from(src: Uuid) -> Self {
        Self::Uuid(src)
    }
}

impl From<crate::RowId> for Value {
    fn from(src: crate::RowId) -> Self {
        Self::Int(src.0)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}

impl<T> From<Vec<T>> for Value
where
    Value: From<T>,
{
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Self::from).collect())
    }
}
