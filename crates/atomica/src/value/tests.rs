use crate::{
    document::Document,
    error::MutationError,
    model::FieldKind,
    types::{Id, Timestamp},
    value::{Value, coercion::cast_value},
};

#[test]
fn values_serialize_as_raw_wire_scalars() {
    let mut doc = Document::new();
    doc.insert("name", Value::from("a"));
    doc.insert("age", Value::Int(5));
    doc.insert("ratio", Value::Float(0.5));
    doc.insert("gone", Value::Null);
    doc.insert("tags", Value::List(vec![Value::from("x"), Value::from("y")]));

    let json = serde_json::to_value(&doc).expect("document must serialize");

    assert_eq!(
        json,
        serde_json::json!({
            "age": 5,
            "gone": null,
            "name": "a",
            "ratio": 0.5,
            "tags": ["x", "y"],
        })
    );
}

#[test]
fn timestamps_serialize_as_seconds() {
    let json = serde_json::to_value(Value::Timestamp(Timestamp::from_seconds(1_704_067_200)))
        .expect("timestamp must serialize");

    assert_eq!(json, serde_json::json!(1_704_067_200));
}

#[test]
fn ids_serialize_as_canonical_text() {
    let id = Id::from_parts(1_700_000_000_000, 7);
    let json = serde_json::to_value(Value::Id(id)).expect("id must serialize");

    assert_eq!(json, serde_json::json!(id.to_string()));
}

#[test]
fn cast_widens_int_to_float() {
    let cast = cast_value("ratio", &FieldKind::Float, Value::Int(3)).expect("int widens");

    assert_eq!(cast, Value::Float(3.0));
}

#[test]
fn cast_parses_rfc3339_text_into_timestamp() {
    let cast = cast_value(
        "seen_at",
        &FieldKind::Timestamp,
        Value::from("2024-01-01T00:00:00Z"),
    )
    .expect("rfc3339 text coerces");

    assert_eq!(cast, Value::Timestamp(Timestamp::from_seconds(1_704_067_200)));
}

#[test]
fn cast_rejects_fractional_float_for_int_field() {
    let err = cast_value("age", &FieldKind::Int, Value::Float(1.5)).unwrap_err();

    assert_eq!(
        err,
        MutationError::Coercion {
            field: "age".to_string(),
            expected: "int",
            actual: "float",
        }
    );
}

#[test]
fn cast_rejects_negative_int_for_uint_field() {
    let err = cast_value("count", &FieldKind::Uint, Value::Int(-1)).unwrap_err();

    assert!(matches!(err, MutationError::Coercion { .. }));
}

#[test]
fn cast_coerces_list_elements() {
    let kind = FieldKind::List(Box::new(FieldKind::Float));
    let cast = cast_value("scores", &kind, Value::List(vec![Value::Int(1), Value::Int(2)]))
        .expect("elements widen");

    assert_eq!(cast, Value::List(vec![Value::Float(1.0), Value::Float(2.0)]));
}

#[test]
fn null_passes_through_every_kind() {
    for kind in [FieldKind::Bool, FieldKind::Int, FieldKind::Text, FieldKind::Document] {
        let cast = cast_value("f", &kind, Value::Null).expect("null is always settable");
        assert_eq!(cast, Value::Null);
    }
}

#[test]
fn checked_add_treats_null_base_as_zero() {
    assert_eq!(
        Value::Null.checked_add(&Value::Int(4)),
        Some(Value::Int(4))
    );
    assert_eq!(
        Value::Int(i64::MAX).checked_add(&Value::Int(1)),
        None
    );
}
