//! Atomic-mutation layer for a schemaless document mapper: targeted
//! field-level update operations against the correct sub-document path, and
//! a touch cascade over touch-on-change relations.
#![warn(unreachable_pub)]

pub mod atomic;
pub mod changes;
pub mod document;
pub mod entity;
pub mod error;
pub mod model;
pub mod obs;
pub mod position;
pub mod store;
pub mod touch;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        atomic::{AtomicKind, AtomicOperation},
        entity::{Entity, EntityRef},
        model::{EntityModel, FieldKind, ModelBuilder},
        position::{Position, PositionResolver},
        touch::TouchExecutor,
        types::{Id, Timestamp},
        value::Value,
    };
}
