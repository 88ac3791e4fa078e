//! Value-to-field-kind conversions applied at materialization time.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ast::{FieldKind, Value};
use crate::error::{RelqError, RelqResult};

fn fail(field: &str, value: &Value, kind: FieldKind) -> RelqError {
    RelqError::conversion(field, value.to_string(), kind.name())
}

/// Convert a fetched value to a target field kind.
///
/// NULL passes through untouched; nullability is the caller's concern.
/// Unrepresentable combinations fail with a `ConversionError` naming the
/// field, never a panic.
pub fn convert(field: &str, value: Value, kind: FieldKind) -> RelqResult<Value> {
    match (&value, kind) {
        (Value::Null, _) => return Ok(Value::Null),
        (Value::Bool(_), FieldKind::Bool)
        | (Value::Int(_), FieldKind::Int)
        | (Value::Float(_), FieldKind::Float)
        | (Value::String(_), FieldKind::Text)
        | (Value::Uuid(_), FieldKind::Uuid)
        | (Value::Timestamp(_), FieldKind::Timestamp)
        | (Value::Decimal(_), FieldKind::Decimal) => return Ok(value),
        _ => {}
    }
    match (&value, kind) {
        (Value::Int(n), FieldKind::Float) => Ok(Value::Float(*n as f64)),
        (Value::Int(n), FieldKind::Decimal) => Ok(Value::Decimal(Decimal::from(*n))),
        (Value::Int(n), FieldKind::Bool) => Ok(Value::Bool(*n != 0)),
        (Value::Float(n), FieldKind::Decimal) => Decimal::try_from(*n)
            .map(Value::Decimal)
            .map_err(|_| fail(field, &value, kind)),
        (Value::Decimal(d), FieldKind::Float) => d
            .to_f64()
            .map(Value::Float)
            .ok_or_else(|| fail(field, &value, kind)),
        (Value::String(s), FieldKind::Uuid) => s
            .parse::<Uuid>()
            .map(Value::Uuid)
            .map_err(|_| fail(field, &value, kind)),
        (Value::String(s), FieldKind::Timestamp) => DateTime::parse_from_rfc3339(s)
            .map(|t| Value::Timestamp(t.with_timezone(&Utc)))
            .map_err(|_| fail(field, &value, kind)),
        (Value::String(s), FieldKind::Decimal) => s
            .parse::<Decimal>()
            .map(Value::Decimal)
            .map_err(|_| fail(field, &value, kind)),
        (Value::Uuid(u), FieldKind::Text) => Ok(Value::String(u.to_string())),
        _ => Err(fail(field, &value, kind)),
    }
}
