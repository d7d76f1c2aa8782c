use crate::{entity::Entity, error::MutationError, store::Selector};
use derive_more::{Deref, Display};

///
/// Position
///
/// Dot-delimited path locating an entity inside its root aggregate. Empty
/// for entities that are themselves root aggregates. Positions are always
/// recomputed by a resolver at operation time; embedded entities move
/// (sibling indices shift) and a cached position silently updates the wrong
/// sibling.
///

#[derive(Clone, Debug, Default, Deref, Display, Eq, PartialEq)]
pub struct Position(String);

impl Position {
    /// Position of a root aggregate.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Full store path for a field at this position.
    #[must_use]
    pub fn field_path(&self, field: &str) -> String {
        if self.is_root() {
            field.to_string()
        } else {
            format!("{}.{field}", self.0)
        }
    }
}

///
/// AtomicLocation
///
/// Where an entity's atomic writes go: the selector identifies the ROOT
/// aggregate document (stores only accept field-path updates against the
/// top-level document), the position prefixes every field path.
///

#[derive(Clone, Debug)]
pub struct AtomicLocation {
    pub position: Position,
    pub selector: Selector,
}

///
/// PositionResolver
///
/// Consumed capability: compute an entity's current location from the live
/// embedding/relation structure. Implementations must not cache across
/// calls.
///

pub trait PositionResolver {
    fn resolve(&self, entity: &Entity) -> Result<AtomicLocation, MutationError>;
}

///
/// RootResolver
/// Trivial resolver for entities that are their own root aggregate.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct RootResolver;

impl PositionResolver for RootResolver {
    fn resolve(&self, entity: &Entity) -> Result<AtomicLocation, MutationError> {
        Ok(AtomicLocation {
            position: Position::root(),
            selector: Selector::by_id(entity.id()),
        })
    }
}
