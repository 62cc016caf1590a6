use chrono::{Duration, NaiveDate, TimeZone, Utc};
use gridline_core::{
    schema::{ColumnField, EntityRef, FieldType},
    Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Editing a value through its raw text yields the same value back.
fn assert_round_trip(field_type: FieldType, value: Value) {
    let field = ColumnField::new(field_type);
    let raw = value.to_raw();
    assert_eq!(Value::from_raw(&field, &raw), Some(value), "raw text {raw:?}");
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

#[test]
fn strings() {
    assert_round_trip(FieldType::String, Value::from("Alice"));
    assert_round_trip(FieldType::String, Value::from("  padded  "));
}

#[test]
fn booleans() {
    assert_round_trip(FieldType::Bool, Value::Bool(true));
    assert_round_trip(FieldType::Bool, Value::Bool(false));
}

#[test]
fn integers() {
    assert_round_trip(FieldType::Int, Value::Int(-17));
    assert_round_trip(FieldType::Int, Value::Int(i64::MAX));
}

#[test]
fn decimals() {
    assert_round_trip(FieldType::Decimal, Value::Decimal(2.5));
    assert_round_trip(FieldType::Decimal, Value::Decimal(-0.125));
}

#[test]
fn references() {
    let items = EntityRef::new("public", "items");
    assert_round_trip(FieldType::reference(items), Value::Int(42));
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

#[test]
fn dates() {
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_round_trip(FieldType::Date, Value::Date(date));
}

#[test]
fn datetimes() {
    let at = Utc.with_ymd_and_hms(2024, 2, 29, 13, 5, 9).unwrap();
    assert_round_trip(FieldType::DateTime, Value::DateTime(at));
}

#[test]
fn datetimes_keep_fractional_seconds() {
    let at = Utc.with_ymd_and_hms(2021, 6, 15, 10, 30, 0).unwrap() + Duration::milliseconds(250);
    assert_round_trip(FieldType::DateTime, Value::DateTime(at));

    let at = Utc.with_ymd_and_hms(2021, 6, 15, 10, 30, 0).unwrap() + Duration::nanoseconds(7);
    assert_round_trip(FieldType::DateTime, Value::DateTime(at));
}

// ---------------------------------------------------------------------------
// Structured values
// ---------------------------------------------------------------------------

#[test]
fn json_documents() {
    assert_round_trip(
        FieldType::Json,
        Value::Json(json!({ "tags": ["a", "b"], "count": 2 })),
    );
}

#[test]
fn arrays() {
    assert_round_trip(
        FieldType::array(FieldType::Int),
        Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
    );
    assert_round_trip(
        FieldType::array(FieldType::String),
        Value::List(vec![Value::from("red"), Value::from("green")]),
    );
}

#[test]
fn arrays_with_separators_in_items() {
    assert_round_trip(
        FieldType::array(FieldType::String),
        Value::List(vec![Value::from("a,b"), Value::from("c")]),
    );
    assert_round_trip(
        FieldType::array(FieldType::String),
        Value::List(vec![Value::from(r"trailing\"), Value::from(r"\,")]),
    );
}

// ---------------------------------------------------------------------------
// Nulls
// ---------------------------------------------------------------------------

#[test]
fn null_needs_a_nullable_field() {
    let raw = Value::Null.to_raw();

    let nullable = ColumnField::new(FieldType::Int).nullable();
    assert_eq!(Value::from_raw(&nullable, &raw), Some(Value::Null));

    let required = ColumnField::new(FieldType::Int);
    assert_eq!(Value::from_raw(&required, &raw), None);
}
