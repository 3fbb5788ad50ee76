use arbor_types::{Id, Key};

use crate::error::ResolveError;

/// Resolution accumulator: everything the extractor chain learns about one
/// entity instance.
///
/// A fresh `Metadata` is created per resolve call and discarded after key
/// assembly; it is never shared across calls or threads. Extractors write
/// into it through the setters; [`Metadata::to_key`] enforces the
/// cross-field invariants at assembly time.
#[derive(Clone, Debug, Default)]
pub struct Metadata {
    kind: String,
    string_id: String,
    int_id: i64,
    parent: Option<Key>,
    has_parent: bool,
    id_field_claimed: bool,
}

impl Metadata {
    /// The logical collection name. Empty until the kind extractor runs.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn set_kind(&mut self, kind: impl Into<String>) {
        self.kind = kind.into();
    }

    pub fn string_id(&self) -> &str {
        &self.string_id
    }

    pub fn set_string_id(&mut self, id: impl Into<String>) {
        self.string_id = id.into();
        self.int_id = 0;
    }

    pub fn int_id(&self) -> i64 {
        self.int_id
    }

    pub fn set_int_id(&mut self, id: i64) {
        self.int_id = id;
        self.string_id.clear();
    }

    /// The ancestor key, attached when the schema requires one and the
    /// entity instance carries it.
    pub fn parent(&self) -> Option<&Key> {
        self.parent.as_ref()
    }

    pub fn set_parent(&mut self, parent: Key) {
        self.parent = Some(parent);
    }

    /// Whether the schema declares the `has_parent` directive.
    pub fn has_parent(&self) -> bool {
        self.has_parent
    }

    pub fn mark_parent_required(&mut self) {
        self.has_parent = true;
    }

    /// Claim the identifier field. Returns `false` if an earlier field
    /// already claimed it — only the first identifier annotation counts,
    /// later ones are ignored.
    pub fn claim_id_field(&mut self) -> bool {
        if self.id_field_claimed {
            return false;
        }
        self.id_field_claimed = true;
        true
    }

    /// Returns `true` if no identifier was extracted and the store must
    /// allocate one on write.
    pub fn is_auto_generated(&self) -> bool {
        self.string_id.is_empty() && self.int_id == 0
    }

    /// Assemble the canonical key.
    ///
    /// Fails with [`ResolveError::MultipleIdFields`] if both identifier
    /// values are set — the setters keep them exclusive, but an external
    /// extractor writing through both is still caught here.
    pub fn to_key(&self) -> Result<Key, ResolveError> {
        if !self.string_id.is_empty() && self.int_id != 0 {
            return Err(ResolveError::MultipleIdFields);
        }
        let id = if !self.string_id.is_empty() {
            Id::Str(self.string_id.clone())
        } else if self.int_id != 0 {
            Id::Int(self.int_id)
        } else {
            Id::None
        };
        let key = match &self.parent {
            Some(parent) => Key::with_parent(self.kind.clone(), id, parent.clone())?,
            None => Key::new(self.kind.clone(), id)?,
        };
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_keep_ids_exclusive() {
        let mut meta = Metadata::default();
        meta.set_string_id("abc");
        meta.set_int_id(7);
        assert_eq!(meta.string_id(), "");
        assert_eq!(meta.int_id(), 7);
        meta.set_string_id("abc");
        assert_eq!(meta.int_id(), 0);
    }

    #[test]
    fn first_claim_wins() {
        let mut meta = Metadata::default();
        assert!(meta.claim_id_field());
        assert!(!meta.claim_id_field());
    }

    #[test]
    fn auto_generated_until_an_id_is_set() {
        let mut meta = Metadata::default();
        assert!(meta.is_auto_generated());
        meta.set_int_id(1);
        assert!(!meta.is_auto_generated());
    }

    #[test]
    fn to_key_assembles_all_components() {
        let parent = Key::new("Account", Id::Int(1)).unwrap();
        let mut meta = Metadata::default();
        meta.set_kind("Invoices");
        meta.set_string_id("inv-1");
        meta.set_parent(parent.clone());
        let key = meta.to_key().unwrap();
        assert_eq!(key.kind(), "Invoices");
        assert_eq!(key.id(), &Id::Str("inv-1".into()));
        assert_eq!(key.parent(), Some(&parent));
    }

    #[test]
    fn to_key_rejects_dual_identifiers() {
        // Simulate a misbehaving extractor writing the fields directly.
        let mut meta = Metadata::default();
        meta.set_kind("Broken");
        meta.set_int_id(7);
        meta.string_id = "abc".into();
        assert_eq!(meta.to_key(), Err(ResolveError::MultipleIdFields));
    }

    #[test]
    fn to_key_without_id_is_incomplete() {
        let mut meta = Metadata::default();
        meta.set_kind("LogLine");
        let key = meta.to_key().unwrap();
        assert!(!key.is_complete());
    }
}
