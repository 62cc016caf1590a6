use super::Value;
use crate::schema::ValueType;
use chrono::{DateTime, NaiveDate, Utc};

impl Value {
    /// Decodes a value sent by the server for a column of type `ty`.
    ///
    /// Returns `None` when the payload does not match the declared type; the
    /// caller marks such values as invalid instead of dropping them.
    pub fn from_json(ty: &ValueType, json: &serde_json::Value) -> Option<Value> {
        use serde_json::Value as Json;

        if json.is_null() {
            return Some(Value::Null);
        }

        match (ty, json) {
            (ValueType::Int, Json::Number(n)) => n.as_i64().map(Value::Int),
            (ValueType::Decimal, Json::Number(n)) => n.as_f64().map(Value::Decimal),
            (ValueType::Decimal, Json::String(s)) => s
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Decimal),
            (ValueType::String, Json::String(s)) => Some(Value::String(s.clone())),
            (ValueType::Bool, Json::Bool(b)) => Some(Value::Bool(*b)),
            (ValueType::Date, Json::String(s)) => parse_date(s).map(Value::Date),
            (ValueType::DateTime, Json::String(s)) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc))),
            (ValueType::Uuid, Json::String(s)) => s.parse().ok().map(Value::Uuid),
            (ValueType::Json, json) => Some(Value::Json(json.clone())),
            (ValueType::Array { subtype }, Json::Array(items)) => items
                .iter()
                .map(|item| Value::from_json(subtype, item))
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
            _ => None,
        }
    }

    /// Converts JSON of unknown type, such as an attribute value, into the
    /// closest canonical value.
    pub fn from_json_untyped(json: &serde_json::Value) -> Value {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Decimal).unwrap_or(Value::Null),
            },
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::List(items.iter().map(Value::from_json_untyped).collect()),
            Json::Object(_) => Value::Json(json.clone()),
        }
    }
}

/// Accepts both plain dates and timestamps with a date prefix.
fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
