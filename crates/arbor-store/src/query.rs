use arbor_types::Key;
use serde::{Deserialize, Serialize};

/// Description of a query against one kind, optionally scoped to an
/// ancestor key.
///
/// The engine only constructs and hands off query specs; execution
/// (filtering, cursors, pagination) is the client's concern. Ancestor
/// scoping selects every record whose key chain contains the given key.
/// Specs are serializable so remote backends can ship them over the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    kind: String,
    ancestor: Option<Key>,
    limit: Option<usize>,
}

impl QuerySpec {
    /// Query all records of the given kind.
    pub fn kind(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ancestor: None,
            limit: None,
        }
    }

    /// Restrict results to descendants of the given key.
    pub fn ancestor(mut self, ancestor: Key) -> Self {
        self.ancestor = Some(ancestor);
        self
    }

    /// Cap the number of returned records.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn kind_name(&self) -> &str {
        &self.kind
    }

    pub fn ancestor_key(&self) -> Option<&Key> {
        self.ancestor.as_ref()
    }

    pub fn limit_hint(&self) -> Option<usize> {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_types::Id;

    #[test]
    fn builder_accumulates() {
        let root = Key::new("Account", Id::Int(1)).unwrap();
        let spec = QuerySpec::kind("Invoice").ancestor(root.clone()).limit(10);
        assert_eq!(spec.kind_name(), "Invoice");
        assert_eq!(spec.ancestor_key(), Some(&root));
        assert_eq!(spec.limit_hint(), Some(10));
    }

    #[test]
    fn serde_round_trip() {
        let root = Key::new("Account", Id::Int(1)).unwrap();
        let spec = QuerySpec::kind("Invoice").ancestor(root).limit(10);
        let json = serde_json::to_string(&spec).unwrap();
        let back: QuerySpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }
}
