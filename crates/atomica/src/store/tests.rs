use crate::{
    atomic::AtomicKind,
    document::Document,
    store::{MemoryStore, Modifier, Selector, StoreClient, StoreError},
    types::Id,
    value::Value,
};

fn seeded() -> (MemoryStore, Id) {
    let id = Id::from_u128(9);
    let mut item = Document::new();
    item.insert("name", Value::from("a"));
    item.insert("age", Value::Int(5));

    let mut root = Document::new();
    root.insert("items", Value::List(vec![Value::Document(item)]));
    root.insert("count", Value::Int(1));

    let store = MemoryStore::new();
    store.put(id, root);
    (store, id)
}

#[test]
fn modifier_serializes_to_the_exact_wire_shape() {
    let mut modifier = Modifier::new();
    modifier.insert(AtomicKind::Unset, "addresses.1.street", Value::Int(1));

    let json = serde_json::to_value(&modifier).expect("modifier must serialize");

    assert_eq!(
        json,
        serde_json::json!({"$unset": {"addresses.1.street": 1}})
    );
}

#[test]
fn selector_serializes_as_a_plain_filter_document() {
    let id = Id::from_u128(9);
    let json = serde_json::to_value(Selector::by_id(id)).expect("selector must serialize");

    assert_eq!(json, serde_json::json!({"_id": id.to_string()}));
}

#[test]
fn set_writes_at_an_embedded_path() {
    let (store, id) = seeded();
    let mut modifier = Modifier::new();
    modifier.insert(AtomicKind::Set, "items.0.name", Value::from("b"));

    store.update(&Selector::by_id(id), &modifier).expect("update applies");

    let doc = store.get(id).unwrap();
    assert_eq!(doc.get_path("items.0.name"), Some(&Value::from("b")));
}

#[test]
fn unset_removes_the_embedded_field() {
    let (store, id) = seeded();
    let mut modifier = Modifier::new();
    modifier.insert(AtomicKind::Unset, "items.0.age", Value::Int(1));

    store.update(&Selector::by_id(id), &modifier).expect("update applies");

    let doc = store.get(id).unwrap();
    assert_eq!(doc.get_path("items.0.age"), None);
    assert_eq!(doc.get_path("items.0.name"), Some(&Value::from("a")));
}

#[test]
fn inc_starts_missing_fields_at_zero() {
    let (store, id) = seeded();
    let mut modifier = Modifier::new();
    modifier.insert(AtomicKind::Inc, "visits", Value::Int(3));
    modifier.insert(AtomicKind::Inc, "count", Value::Int(2));

    store.update(&Selector::by_id(id), &modifier).expect("update applies");

    let doc = store.get(id).unwrap();
    assert_eq!(doc.get_path("visits"), Some(&Value::Int(3)));
    assert_eq!(doc.get_path("count"), Some(&Value::Int(3)));
}

#[test]
fn inc_on_a_text_field_is_a_type_mismatch() {
    let (store, id) = seeded();
    let mut modifier = Modifier::new();
    modifier.insert(AtomicKind::Inc, "items.0.name", Value::Int(1));

    let err = store.update(&Selector::by_id(id), &modifier).unwrap_err();

    assert_eq!(
        err,
        StoreError::TypeMismatch {
            path: "items.0.name".to_string()
        }
    );
}

#[test]
fn push_creates_the_list_and_pull_filters_it() {
    let (store, id) = seeded();

    let mut push = Modifier::new();
    push.insert(AtomicKind::Push, "tags", Value::from("x"));
    store.update(&Selector::by_id(id), &push).unwrap();
    store.update(&Selector::by_id(id), &push).unwrap();

    let mut pull = Modifier::new();
    pull.insert(AtomicKind::Pull, "tags", Value::from("x"));
    store.update(&Selector::by_id(id), &pull).unwrap();

    let doc = store.get(id).unwrap();
    assert_eq!(doc.get_path("tags"), Some(&Value::List(vec![])));
}

#[test]
fn failed_updates_leave_the_document_unchanged() {
    let (store, id) = seeded();
    let mut modifier = Modifier::new();
    modifier.insert(AtomicKind::Inc, "count", Value::Int(2));
    modifier.insert(AtomicKind::Inc, "items.0.name", Value::Int(1));

    let err = store.update(&Selector::by_id(id), &modifier).unwrap_err();

    assert!(matches!(err, StoreError::TypeMismatch { .. }));
    // the valid entry must not have been half-applied
    let doc = store.get(id).unwrap();
    assert_eq!(doc.get_path("count"), Some(&Value::Int(1)));
    assert_eq!(store.update_count(), 0);
}

#[test]
fn custom_filter_selectors_expose_no_identity() {
    let mut filter = Document::new();
    filter.insert("slug", Value::from("a"));
    let selector = Selector::from_document(filter);

    assert_eq!(selector.id(), None);
    assert_eq!(selector.document().get("slug"), Some(&Value::from("a")));
}

#[test]
fn updates_against_an_unknown_root_fail() {
    let (store, _) = seeded();
    let mut modifier = Modifier::new();
    modifier.insert(AtomicKind::Set, "name", Value::from("b"));

    let err = store
        .update(&Selector::by_id(Id::from_u128(404)), &modifier)
        .unwrap_err();

    assert!(matches!(err, StoreError::MissingDocument { .. }));
}

#[test]
fn injected_failures_surface_once() {
    let (store, id) = seeded();
    store.fail_next_update(StoreError::Backend {
        message: "connection reset".to_string(),
    });

    let mut modifier = Modifier::new();
    modifier.insert(AtomicKind::Set, "count", Value::Int(2));

    let err = store.update(&Selector::by_id(id), &modifier).unwrap_err();
    assert!(matches!(err, StoreError::Backend { .. }));
    assert_eq!(store.update_count(), 0);

    store.update(&Selector::by_id(id), &modifier).expect("store recovered");
    assert_eq!(store.update_count(), 1);
}
