use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::KeyError;

/// Record identifier within a kind.
///
/// Exactly one of the concrete variants identifies a stored record.
/// [`Id::None`] marks an incomplete key: the store allocates an integer
/// identifier when the record is first written.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Id {
    /// No identifier yet; the store allocates one on write.
    None,
    /// Caller-supplied string identifier.
    Str(String),
    /// Caller-supplied integer identifier.
    Int(i64),
}

impl Id {
    /// Returns `true` if no identifier has been assigned.
    pub fn is_none(&self) -> bool {
        matches!(self, Id::None)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::None => write!(f, "?"),
            Id::Str(s) => write!(f, "{s}"),
            Id::Int(n) => write!(f, "{n}"),
        }
    }
}

/// Hierarchical storage key: `(kind, id, parent)`.
///
/// A key names one record in the backing store. The optional parent forms
/// an ancestor chain; stores that support ancestor queries treat all keys
/// sharing a root ancestor as one entity group. Two keys are equal iff
/// kind, identifier, and the full ancestor chain are equal.
///
/// Keys are immutable once built. [`Key::with_id`] derives a completed
/// copy from an incomplete key after the store allocates an identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    kind: String,
    id: Id,
    parent: Option<Box<Key>>,
}

impl Key {
    /// Build a root key with an explicit identifier.
    pub fn new(kind: impl Into<String>, id: Id) -> Result<Self, KeyError> {
        Self::build(kind.into(), id, None)
    }

    /// Build a key under the given parent.
    pub fn with_parent(kind: impl Into<String>, id: Id, parent: Key) -> Result<Self, KeyError> {
        Self::build(kind.into(), id, Some(parent))
    }

    /// Build an incomplete root key; the store assigns the identifier.
    pub fn incomplete(kind: impl Into<String>) -> Result<Self, KeyError> {
        Self::build(kind.into(), Id::None, None)
    }

    fn build(kind: String, id: Id, parent: Option<Key>) -> Result<Self, KeyError> {
        if kind.is_empty() {
            return Err(KeyError::EmptyKind);
        }
        if let Some(ref p) = parent {
            if !p.is_complete() {
                return Err(KeyError::IncompleteParent(p.to_string()));
            }
        }
        Ok(Self {
            kind,
            id,
            parent: parent.map(Box::new),
        })
    }

    /// The logical collection name this key belongs to.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The record identifier.
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// The direct ancestor, if any.
    pub fn parent(&self) -> Option<&Key> {
        self.parent.as_deref()
    }

    /// Returns `true` if the key carries a concrete identifier.
    pub fn is_complete(&self) -> bool {
        !self.id.is_none()
    }

    /// Derive a completed copy with the given identifier, keeping kind and
    /// ancestor chain.
    pub fn with_id(&self, id: Id) -> Key {
        Key {
            kind: self.kind.clone(),
            id,
            parent: self.parent.clone(),
        }
    }

    /// The full key path, root ancestor first, this key last.
    pub fn path(&self) -> Vec<&Key> {
        let mut path = Vec::new();
        let mut cursor = Some(self);
        while let Some(key) = cursor {
            path.push(key);
            cursor = key.parent();
        }
        path.reverse();
        path
    }

    /// Returns `true` if `self` appears in `other`'s ancestor chain.
    pub fn is_ancestor_of(&self, other: &Key) -> bool {
        let mut cursor = other.parent();
        while let Some(key) = cursor {
            if key == self {
                return true;
            }
            cursor = key.parent();
        }
        false
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, key) in self.path().iter().enumerate() {
            if index > 0 {
                write!(f, "/")?;
            }
            write!(f, "{},{}", key.kind, key.id)?;
        }
        Ok(())
    }
}
