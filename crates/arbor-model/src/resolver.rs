use arbor_types::Key;
use tracing::debug;

use crate::entity::{Entity, EntityView};
use crate::error::ResolveError;
use crate::extract::ExtractorChain;
use crate::metadata::Metadata;

/// Derives storage keys from entity metadata.
///
/// The resolver holds only the extractor chain; all per-resolve state
/// lives in a fresh [`Metadata`] per call, so one resolver instance is
/// safe to share across concurrent callers.
///
/// Two entry points with deliberately different tolerance:
/// - [`resolve`](KeyResolver::resolve) — the create path; an entity with
///   no identifier field resolves to an incomplete key the store completes
///   on write.
/// - [`resolve_for_mutation`](KeyResolver::resolve_for_mutation) — the
///   load/update/delete path; an incomplete key is an error, because a
///   mutation cannot discover a store-allocated identifier retroactively.
pub struct KeyResolver {
    chain: ExtractorChain,
}

impl KeyResolver {
    /// Resolver with the standard extractor chain.
    pub fn new() -> Self {
        Self {
            chain: ExtractorChain::standard(),
        }
    }

    /// Resolver with a custom chain.
    pub fn with_chain(chain: ExtractorChain) -> Self {
        Self { chain }
    }

    /// Resolve the entity's key and write it onto the entity's key slot.
    ///
    /// Runs the extractor chain over the entity's declared fields, enforces
    /// the single-identifier invariant, and assembles the canonical key.
    /// On failure nothing is written to the entity.
    pub fn resolve<E: Entity>(&self, entity: &mut E) -> Result<Resolution, ResolveError> {
        let (metadata, key) = self.run_chain(&*entity)?;
        entity.set_key(key.clone());
        debug!(key = %key, "resolved key");
        Ok(Resolution { key, metadata })
    }

    /// Resolve for load/update/delete; incomplete keys are rejected before
    /// anything is written to the entity.
    pub fn resolve_for_mutation<E: Entity>(
        &self,
        entity: &mut E,
    ) -> Result<Resolution, ResolveError> {
        let (metadata, key) = self.run_chain(&*entity)?;
        if metadata.is_auto_generated() {
            return Err(ResolveError::MissingAutoGeneratedKey);
        }
        entity.set_key(key.clone());
        Ok(Resolution { key, metadata })
    }

    fn run_chain<E: Entity>(&self, entity: &E) -> Result<(Metadata, Key), ResolveError> {
        let mut metadata = Metadata::default();
        let view = EntityView::of(entity);
        self.chain.extract_from(&view, &mut metadata)?;
        let key = metadata.to_key()?;
        Ok((metadata, key))
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyResolver")
            .field("chain", &self.chain)
            .finish()
    }
}

/// Outcome of one resolve call: the assembled key plus the metadata the
/// chain accumulated.
#[derive(Clone, Debug)]
pub struct Resolution {
    key: Key,
    metadata: Metadata,
}

impl Resolution {
    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn into_key(self) -> Key {
        self.key
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns `true` iff the store must allocate the identifier on write.
    pub fn is_auto_generated(&self) -> bool {
        self.metadata.is_auto_generated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{Account, Invoice, LogLine};
    use arbor_types::Id;

    #[test]
    fn string_id_yields_string_key() {
        let resolver = KeyResolver::new();
        let mut account = Account::with_email("a@example.com");
        let resolution = resolver.resolve(&mut account).unwrap();
        assert_eq!(resolution.key().kind(), "Accounts");
        assert_eq!(resolution.key().id(), &Id::Str("a@example.com".into()));
        assert!(!resolution.is_auto_generated());
        assert_eq!(account.key.as_ref(), Some(resolution.key()));
    }

    #[test]
    fn int_id_yields_int_key_under_parent() {
        let resolver = KeyResolver::new();
        let parent = Key::new("Account", Id::Int(1)).unwrap();
        let mut invoice = Invoice::under(42, parent.clone());
        let resolution = resolver.resolve(&mut invoice).unwrap();
        assert_eq!(resolution.key().id(), &Id::Int(42));
        assert_eq!(resolution.key().parent(), Some(&parent));
    }

    #[test]
    fn no_id_field_is_auto_generated() {
        let resolver = KeyResolver::new();
        let mut line = LogLine::saying("hello");
        let resolution = resolver.resolve(&mut line).unwrap();
        assert!(resolution.is_auto_generated());
        assert!(!resolution.key().is_complete());
        assert_eq!(resolution.key().kind(), "LogLine");
    }

    #[test]
    fn failure_writes_nothing_to_the_entity() {
        let resolver = KeyResolver::new();
        let mut invoice = Invoice::numbered(7); // has_parent, no parent set
        assert!(resolver.resolve(&mut invoice).is_err());
        assert!(invoice.key.is_none());
    }

    #[test]
    fn mutation_path_rejects_auto_generated_keys() {
        let resolver = KeyResolver::new();
        let mut line = LogLine::saying("hello");
        let err = resolver.resolve_for_mutation(&mut line).unwrap_err();
        assert_eq!(err, ResolveError::MissingAutoGeneratedKey);
        // The create path tolerates the very same entity.
        assert!(resolver.resolve(&mut line).is_ok());
    }

    #[test]
    fn mutation_path_accepts_explicit_ids() {
        let resolver = KeyResolver::new();
        let mut account = Account::with_email("a@example.com");
        let resolution = resolver.resolve_for_mutation(&mut account).unwrap();
        assert!(resolution.key().is_complete());
    }

    #[test]
    fn parent_requirement_is_satisfiable() {
        let resolver = KeyResolver::new();
        let mut invoice = Invoice::numbered(7);
        assert_eq!(
            resolver.resolve(&mut invoice).unwrap_err(),
            ResolveError::MissingParentKey
        );
        invoice.account = Some(Key::new("Account", Id::Int(1)).unwrap());
        assert!(resolver.resolve(&mut invoice).is_ok());
    }

    #[test]
    fn shared_resolver_does_not_leak_state_across_calls() {
        let resolver = KeyResolver::new();
        let parent = Key::new("Account", Id::Int(1)).unwrap();

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let resolver = &resolver;
                let parent = parent.clone();
                scope.spawn(move || {
                    for round in 0i64..200 {
                        let email = format!("user{worker}-{round}@example.com");
                        let mut account = Account::with_email(&email);
                        let resolution = resolver.resolve(&mut account).unwrap();
                        assert_eq!(resolution.key().id(), &Id::Str(email.clone()));
                        assert_eq!(resolution.key().parent(), None);

                        let mut invoice = Invoice::under(round + 1, parent.clone());
                        let resolution = resolver.resolve(&mut invoice).unwrap();
                        assert_eq!(resolution.key().id(), &Id::Int(round + 1));
                        assert_eq!(resolution.key().parent(), Some(&parent));
                    }
                });
            }
        });
    }
}
