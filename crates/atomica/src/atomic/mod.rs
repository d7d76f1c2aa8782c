mod operation;


pub use operation::AtomicOperation;

///
/// AtomicKind
///
/// Semantic operation kinds and their wire operators. The operator strings
/// are part of the store contract and never change shape.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AtomicKind {
    /// Write field values.
    Set,
    /// Remove fields. The caller-supplied value is ignored; the wire payload
    /// is the conventional sentinel `1`.
    Unset,
    /// Add a numeric delta.
    Inc,
    /// Append one element to a list field.
    Push,
    /// Remove all matching elements from a list field.
    Pull,
}

impl AtomicKind {
    #[must_use]
    pub const fn operator(self) -> &'static str {
        match self {
            Self::Set => "$set",
            Self::Unset => "$unset",
            Self::Inc => "$inc",
            Self::Push => "$push",
            Self::Pull => "$pull",
        }
    }
}
