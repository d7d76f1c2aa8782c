use crate::value::Value;
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::collections::BTreeMap;

///
/// Document
///
/// Field → value map backing entity attributes and stored root aggregates.
/// Keys are store-native field names. Dot-delimited paths address embedded
/// documents and list positions (`addresses.1.street`).
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    fields: BTreeMap<String, Value>,
}

///
/// PathError
///
/// A dot-path step that cannot be traversed or created.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathError {
    /// A list was indexed out of bounds.
    IndexOutOfBounds { segment: String },
    /// An intermediate value is neither a document nor a list.
    NotTraversable { segment: String },
}

impl Document {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields.get_mut(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Read the value at a dot-delimited path. Numeric segments index lists.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;

        for segment in segments {
            current = match current {
                Value::Document(doc) => doc.get(segment)?,
                Value::List(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }

    /// Write the value at a dot-delimited path, creating intermediate
    /// sub-documents for missing non-numeric segments. List positions must
    /// already exist; a store cannot invent siblings on a positional write.
    pub fn set_path(&mut self, path: &str, value: Value) -> Result<(), PathError> {
        let slot = self.slot_mut(path, true)?;
        *slot = value;

        Ok(())
    }

    /// Remove the value at a dot-delimited path. Missing paths are a silent
    /// no-op, matching store `$unset` semantics.
    pub fn remove_path(&mut self, path: &str) -> Result<Option<Value>, PathError> {
        let Some((parent, leaf)) = path.rsplit_once('.') else {
            return Ok(self.fields.remove(path));
        };

        match self.slot_mut(parent, false) {
            Ok(Value::Document(doc)) => Ok(doc.remove(leaf)),
            // Unsetting a list position nulls it out; positions of the
            // remaining siblings must not shift under a positional write.
            Ok(Value::List(items)) => {
                let index = leaf
                    .parse::<usize>()
                    .map_err(|_| PathError::NotTraversable {
                        segment: leaf.to_string(),
                    })?;
                match items.get_mut(index) {
                    Some(slot) => Ok(Some(std::mem::replace(slot, Value::Null))),
                    None => Ok(None),
                }
            }
            Ok(_) => Err(PathError::NotTraversable {
                segment: leaf.to_string(),
            }),
            Err(_) => Ok(None),
        }
    }

    // Resolve the mutable slot for `path`, optionally creating intermediate
    // documents along the way.
    fn slot_mut(&mut self, path: &str, create: bool) -> Result<&mut Value, PathError> {
        let not_traversable = |segment: &str| PathError::NotTraversable {
            segment: segment.to_string(),
        };

        let mut segments = path.split('.').peekable();
        let first = segments.next().ok_or_else(|| not_traversable(path))?;

        let mut current = if create {
            self.fields.entry(first.to_string()).or_insert_with(|| {
                if segments.peek().is_some() {
                    Value::Document(Self::new())
                } else {
                    Value::Null
                }
            })
        } else {
            self.fields.get_mut(first).ok_or_else(|| not_traversable(first))?
        };

        while let Some(segment) = segments.next() {
            let has_more = segments.peek().is_some();
            current = match current {
                Value::Document(doc) => {
                    if create {
                        doc.fields.entry(segment.to_string()).or_insert_with(|| {
                            if has_more {
                                Value::Document(Self::new())
                            } else {
                                Value::Null
                            }
                        })
                    } else {
                        doc.fields
                            .get_mut(segment)
                            .ok_or_else(|| not_traversable(segment))?
                    }
                }
                Value::List(items) => {
                    let index = segment
                        .parse::<usize>()
                        .map_err(|_| not_traversable(segment))?;
                    items.get_mut(index).ok_or(PathError::IndexOutOfBounds {
                        segment: segment.to_string(),
                    })?
                }
                _ => return Err(not_traversable(segment)),
            };
        }

        Ok(current)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in &self.fields {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
