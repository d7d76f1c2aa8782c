//! Declared-kind casting for caller-supplied values.
//!
//! Atomic operations accept raw `Value`s; when the entity model declares a
//! kind for the target field, the value is routed through these tables before
//! it reaches the wire. Fields without a declared kind pass through untouched
//! (permissive schemaless semantics).

use crate::{
    error::MutationError,
    model::FieldKind,
    types::Timestamp,
    value::Value,
};
use num_traits::cast;

/// Cast `value` to the declared `kind` of `field`.
///
/// `Null` always passes through: every kind is unsettable.
pub fn cast_value(field: &str, kind: &FieldKind, value: Value) -> Result<Value, MutationError> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    let actual = value.type_name();
    let mismatch = |expected: &'static str| MutationError::Coercion {
        field: field.to_string(),
        expected,
        actual,
    };

    match kind {
        FieldKind::Bool => match value {
            Value::Bool(_) => Ok(value),
            _ => Err(mismatch("bool")),
        },
        FieldKind::Int => match value {
            Value::Int(_) => Ok(value),
            Value::Uint(u) => cast::<u64, i64>(u).map(Value::Int).ok_or_else(|| mismatch("int")),
            Value::Float(f) if f.fract() == 0.0 => {
                cast::<f64, i64>(f).map(Value::Int).ok_or_else(|| mismatch("int"))
            }
            _ => Err(mismatch("int")),
        },
        FieldKind::Uint => match value {
            Value::Uint(_) => Ok(value),
            Value::Int(i) => cast::<i64, u64>(i).map(Value::Uint).ok_or_else(|| mismatch("uint")),
            _ => Err(mismatch("uint")),
        },
        FieldKind::Float => match value {
            Value::Float(_) => Ok(value),
            Value::Int(i) => cast::<i64, f64>(i)
                .map(Value::Float)
                .ok_or_else(|| mismatch("float")),
            Value::Uint(u) => cast::<u64, f64>(u)
                .map(Value::Float)
                .ok_or_else(|| mismatch("float")),
            _ => Err(mismatch("float")),
        },
        FieldKind::Text => match value {
            Value::Text(_) => Ok(value),
            _ => Err(mismatch("text")),
        },
        FieldKind::Timestamp => match value {
            Value::Timestamp(_) => Ok(value),
            Value::Uint(u) => Ok(Value::Timestamp(Timestamp::from_seconds(u))),
            Value::Int(i) => cast::<i64, u64>(i)
                .map(|secs| Value::Timestamp(Timestamp::from_seconds(secs)))
                .ok_or_else(|| mismatch("timestamp")),
            Value::Text(ref s) => Timestamp::parse_rfc3339(s)
                .map(Value::Timestamp)
                .map_err(|_| mismatch("timestamp")),
            _ => Err(mismatch("timestamp")),
        },
        FieldKind::Id => match value {
            Value::Id(_) => Ok(value),
            Value::Text(ref s) => s
                .parse()
                .map(Value::Id)
                .map_err(|_| mismatch("id")),
            _ => Err(mismatch("id")),
        },
        FieldKind::List(elem) => match value {
            Value::List(items) => items
                .into_iter()
                .map(|item| cast_value(field, elem, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            _ => Err(mismatch("list")),
        },
        FieldKind::Document => match value {
            Value::Document(_) => Ok(value),
            _ => Err(mismatch("document")),
        },
    }
}
