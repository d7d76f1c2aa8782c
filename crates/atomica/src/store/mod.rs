pub mod memory;

#[cfg(test)]
mod tests;

pub use memory::MemoryStore;

use crate::{atomic::AtomicKind, document::Document, types::Id, value::Value};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// StoreError
///
/// Failures surfaced by a store client. Propagated verbatim by the mutation
/// layer; retry policy belongs to the client or the caller.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("no document matches selector: {selector}")]
    MissingDocument { selector: String },

    #[error("update path cannot be applied: {path}")]
    InvalidPath { path: String },

    #[error("value at {path} has an incompatible type for the operator")]
    TypeMismatch { path: String },

    #[error("store backend failure: {message}")]
    Backend { message: String },
}

///
/// Selector
///
/// Filter expression identifying a ROOT aggregate document. Atomic updates
/// are always addressed to the root, never to an embedded entity.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Selector(Document);

impl Selector {
    /// Canonical identity selector.
    #[must_use]
    pub fn by_id(id: Id) -> Self {
        let mut doc = Document::new();
        doc.insert("_id", Value::Id(id));
        Self(doc)
    }

    #[must_use]
    pub const fn from_document(doc: Document) -> Self {
        Self(doc)
    }

    /// The id this selector filters on, when it is an identity selector.
    #[must_use]
    pub fn id(&self) -> Option<Id> {
        self.0.get("_id").and_then(Value::as_id)
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.0
    }
}

///
/// Modifier
///
/// Wire-level update expression: operator → (full field path → value). Sent
/// to the store verbatim; the serialized shape
/// `{"$unset": {"addresses.1.street": 1}}` is the bit-level contract.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Modifier {
    ops: BTreeMap<&'static str, BTreeMap<String, Value>>,
}

impl Modifier {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ops: BTreeMap::new(),
        }
    }

    /// Add one `path := value` entry under an operator.
    pub fn insert(&mut self, kind: AtomicKind, path: impl Into<String>, value: Value) {
        self.ops
            .entry(kind.operator())
            .or_default()
            .insert(path.into(), value);
    }

    #[must_use]
    pub fn entries(&self, kind: AtomicKind) -> Option<&BTreeMap<String, Value>> {
        self.ops.get(kind.operator())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn operators(&self) -> impl Iterator<Item = (&'static str, &BTreeMap<String, Value>)> {
        self.ops.iter().map(|(op, entries)| (*op, entries))
    }
}

///
/// StoreClient
///
/// Synchronous update contract against the document store. The only call in
/// this layer that may block on I/O; cancellation and timeouts are the
/// client's own business.
///

pub trait StoreClient {
    fn update(&self, selector: &Selector, modifier: &Modifier) -> Result<(), StoreError>;
}
