use crate::store::StoreError;
use thiserror::Error as ThisError;

///
/// MutationError
///
/// Structured failures for atomic mutations and touch cascades. Input
/// validation variants fire before any store I/O; `Store` wraps the store
/// client's failure verbatim (no retry at this layer).
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MutationError {
    #[error("atomic operation requires at least one field")]
    EmptyFieldSet,

    #[error("unknown field for strict model: {name}")]
    UnknownField { name: String },

    #[error("cannot coerce value for field {field}: expected {expected}, found {actual}")]
    Coercion {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("entity has no resolvable position: {reason}")]
    Unresolvable { reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("touch cascade partially failed: {failed} of {attempted} relations")]
    PartialCascade { attempted: usize, failed: usize },
}

impl MutationError {
    /// Construct an unknown-field failure.
    #[must_use]
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField { name: name.into() }
    }

    /// Construct a position-resolution failure.
    #[must_use]
    pub fn unresolvable(reason: impl Into<String>) -> Self {
        Self::Unresolvable {
            reason: reason.into(),
        }
    }
}
