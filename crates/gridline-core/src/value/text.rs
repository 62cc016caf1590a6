use super::Value;

/// Format dates are edited and displayed in.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format timestamps are edited and displayed in, always in UTC. Fractions of
/// a second are shown only when present.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

impl Value {
    /// Human-readable text of the value. Null renders as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Decimal(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Date(d) => d.format(DATE_FORMAT).to_string(),
            Value::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
            Value::Uuid(u) => u.to_string(),
            Value::Json(json) => json.to_string(),
            Value::List(items) => items
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}
