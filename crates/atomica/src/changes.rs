use crate::value::Value;
use std::collections::BTreeMap;

///
/// ChangeSet
///
/// Record of locally dirty fields pending reconciliation with the store.
/// Keys are store-native field names; values are the field's value before
/// the first local write (later writes keep the earliest old value).
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangeSet {
    dirty: BTreeMap<String, Value>,
    previous: BTreeMap<String, Value>,
}

impl ChangeSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dirty: BTreeMap::new(),
            previous: BTreeMap::new(),
        }
    }

    /// Mark a field dirty. Only the first record for a field keeps its old
    /// value; re-dirtying an already-dirty field is a no-op on the old value.
    pub fn record(&mut self, field: impl Into<String>, old_value: Value) {
        self.dirty.entry(field.into()).or_insert(old_value);
    }

    /// Clear the dirty marker for one field (it was just persisted).
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.dirty.remove(field)
    }

    /// Clear dirty markers for a set of just-persisted fields.
    pub fn remove_many<'a>(&mut self, fields: impl IntoIterator<Item = &'a str>) {
        for field in fields {
            self.dirty.remove(field);
        }
    }

    /// Reconcile after a full-document write: everything dirty becomes the
    /// previous change set.
    pub fn move_changes(&mut self) {
        self.previous = std::mem::take(&mut self.dirty);
    }

    #[must_use]
    pub fn is_dirty(&self, field: &str) -> bool {
        self.dirty.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    /// Old value recorded for a dirty field.
    #[must_use]
    pub fn old_value(&self, field: &str) -> Option<&Value> {
        self.dirty.get(field)
    }

    /// Old value for a field reconciled by the last `move_changes`.
    #[must_use]
    pub fn previous(&self, field: &str) -> Option<&Value> {
        self.previous.get(field)
    }

    pub fn dirty_fields(&self) -> impl Iterator<Item = &str> {
        self.dirty.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_record_keeps_the_earliest_old_value() {
        let mut changes = ChangeSet::new();
        changes.record("name", Value::from("a"));
        changes.record("name", Value::from("b"));

        assert_eq!(changes.old_value("name"), Some(&Value::from("a")));
    }

    #[test]
    fn remove_clears_only_the_named_field() {
        let mut changes = ChangeSet::new();
        changes.record("name", Value::Null);
        changes.record("age", Value::Null);
        changes.remove("name");

        assert!(!changes.is_dirty("name"));
        assert!(changes.is_dirty("age"));
    }

    #[test]
    fn dirty_fields_lists_pending_names() {
        let mut changes = ChangeSet::new();
        changes.record("name", Value::Null);
        changes.record("age", Value::Null);

        let fields: Vec<&str> = changes.dirty_fields().collect();
        assert_eq!(fields, ["age", "name"]);
    }

    #[test]
    fn move_changes_shifts_dirty_to_previous() {
        let mut changes = ChangeSet::new();
        changes.record("age", Value::Int(4));
        changes.move_changes();

        assert!(changes.is_empty());
        assert_eq!(changes.previous("age"), Some(&Value::Int(4)));
    }
}
