use super::{Value, DATETIME_FORMAT, DATE_FORMAT};
use crate::schema::{ColumnField, FieldType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

impl Value {
    /// Validates editor input for a field.
    ///
    /// `raw` is usually the text typed by the user, but already-canonical
    /// values of the right type are accepted too. Returns `None` when the
    /// input does not pass validation.
    pub fn from_raw(field: &ColumnField, raw: &Value) -> Option<Value> {
        if is_blank(raw) {
            return field.is_nullable.then_some(Value::Null);
        }
        from_raw_typed(&field.field_type, raw)
    }

    /// The editable text form of this value, accepted back by
    /// [`Value::from_raw`]. List items are separated by commas; commas and
    /// backslashes inside an item are escaped with a backslash.
    pub fn to_raw(&self) -> Value {
        match self {
            Value::List(items) => Value::String(
                items
                    .iter()
                    .map(|item| item.to_text().replace('\\', "\\\\").replace(',', "\\,"))
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            _ => Value::String(self.to_text()),
        }
    }
}

/// 2^63: integral decimals in `[-2^63, 2^63)` fit an `i64` exactly.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn is_blank(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn from_raw_typed(ty: &FieldType, raw: &Value) -> Option<Value> {
    match ty {
        FieldType::String => raw.as_str().map(Value::from),
        FieldType::Enum { values } => raw
            .as_str()
            .filter(|s| values.iter().any(|v| v == s))
            .map(Value::from),
        FieldType::Bool => match raw {
            Value::Bool(b) => Some(Value::Bool(*b)),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(Value::Bool(true)),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(Value::Bool(false)),
            _ => None,
        },
        FieldType::Int | FieldType::Reference { .. } => match raw {
            Value::Int(i) => Some(Value::Int(*i)),
            Value::Decimal(f) if f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(f) => {
                Some(Value::Int(*f as i64))
            }
            Value::String(s) => s.trim().parse().ok().map(Value::Int),
            _ => None,
        },
        FieldType::Decimal => match raw {
            Value::Decimal(f) => Some(Value::Decimal(*f)),
            Value::Int(i) => Some(Value::Decimal(*i as f64)),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Decimal),
            _ => None,
        },
        FieldType::Date => match raw {
            Value::Date(d) => Some(Value::Date(*d)),
            Value::String(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                .ok()
                .map(Value::Date),
            _ => None,
        },
        FieldType::DateTime => match raw {
            Value::DateTime(dt) => Some(Value::DateTime(*dt)),
            Value::String(s) => parse_datetime(s.trim()).map(Value::DateTime),
            _ => None,
        },
        FieldType::Uuid => match raw {
            Value::Uuid(u) => Some(Value::Uuid(*u)),
            Value::String(s) => s.trim().parse().ok().map(Value::Uuid),
            _ => None,
        },
        FieldType::Json => match raw {
            Value::Json(json) => Some(Value::Json(json.clone())),
            Value::String(s) => serde_json::from_str(s).ok().map(Value::Json),
            _ => None,
        },
        FieldType::Array { subtype } => {
            let items: Vec<Value> = match raw {
                Value::List(items) => items.clone(),
                Value::String(s) => split_items(s),
                _ => return None,
            };
            // Elements are never nullable.
            items
                .iter()
                .map(|item| {
                    if is_blank(item) {
                        None
                    } else {
                        from_raw_typed(subtype, item)
                    }
                })
                .collect::<Option<Vec<_>>>()
                .map(Value::List)
        }
    }
}

/// Splits list input on commas not escaped with a backslash. A backslash
/// before anything other than a comma or backslash is kept as is.
fn split_items(s: &str) -> Vec<Value> {
    let mut items = vec![];
    let mut item = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next_if(|next| matches!(next, ',' | '\\')) {
                Some(escaped) => item.push(escaped),
                None => item.push('\\'),
            },
            ',' => items.push(Value::String(std::mem::take(&mut item))),
            c => item.push(c),
        }
    }
    items.push(Value::String(item));
    items
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}
