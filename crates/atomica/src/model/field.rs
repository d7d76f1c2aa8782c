///
/// FieldModel
/// Runtime field metadata used by translation and casting.
///

#[derive(Clone, Debug)]
pub struct FieldModel {
    /// Logical field name as used by application code.
    pub name: String,
    /// Store-native field name (differs from `name` for aliased fields).
    pub store_name: String,
    /// Declared kind; `None` for untyped pass-through fields.
    pub kind: Option<FieldKind>,
}

impl FieldModel {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: Option<FieldKind>) -> Self {
        let name = name.into();
        Self {
            store_name: name.clone(),
            name,
            kind,
        }
    }

    /// Store the field under a different wire name.
    #[must_use]
    pub fn stored_as(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = store_name.into();
        self
    }
}

///
/// FieldKind
///
/// Minimal type surface needed by value coercion. Aligned with `Value`
/// variants; this is a lossy projection of whatever richer schema the
/// surrounding mapper carries.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Bool,
    Float,
    Int,
    Text,
    Timestamp,
    Uint,
    Id,

    // Collections
    List(Box<Self>),
    Document,
}

impl FieldKind {
    /// Element kind for list fields; push/pull values are coerced against
    /// the element, not the list.
    #[must_use]
    pub fn element(&self) -> &Self {
        match self {
            Self::List(elem) => elem,
            other => other,
        }
    }
}
