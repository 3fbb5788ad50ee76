use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use arbor_store::{Context, QuerySpec, StoreClient, StoreError};
use arbor_types::{Clock, Key, SystemClock, Timestamp};

use crate::entity::Entity;
use crate::error::MapperError;
use crate::resolver::KeyResolver;

/// What `create` does when a record already exists at the resolved key.
///
/// The store's native put semantics (last write wins) are the default;
/// `EnsureAbsent` reinstates an explicit pre-existence check at the cost
/// of one extra read per create.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CreatePolicy {
    /// Let the store's put semantics decide; an existing record is
    /// overwritten.
    #[default]
    StoreDecides,
    /// Fail with [`MapperError::AlreadyExists`] if a record is present at
    /// the resolved key before writing.
    EnsureAbsent,
}

/// Mapper configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct DatastoreConfig {
    pub create_policy: CreatePolicy,
}

/// CRUD facade over a store client.
///
/// Every operation resolves the entity's key first, then delegates
/// persistence to the client. The mapper's only side effects are the
/// entity's key slot, the entity's creation-timestamp slot (create only),
/// and the store's state; the clock and context are shared read-only
/// collaborators, so one mapper instance serves concurrent callers.
pub struct Datastore<S: StoreClient> {
    store: S,
    context: Context,
    resolver: KeyResolver,
    clock: Arc<dyn Clock>,
    config: DatastoreConfig,
}

impl<S: StoreClient> Datastore<S> {
    /// Mapper over the given client and session context, with the standard
    /// resolver, the system clock, and default configuration.
    pub fn new(store: S, context: Context) -> Self {
        Self {
            store,
            context,
            resolver: KeyResolver::new(),
            clock: Arc::new(SystemClock),
            config: DatastoreConfig::default(),
        }
    }

    /// Replace the clock (tests pin time with a fixed clock).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: DatastoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the resolver (custom extractor chains).
    pub fn with_resolver(mut self, resolver: KeyResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// The session context threaded through every store call.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Create the entity: resolve (store-allocated identifiers allowed),
    /// stamp the creation timestamp, write, and adopt the store-returned
    /// key. For incomplete keys the store, not the resolver, supplies the
    /// final identifier.
    pub fn create<E: Entity + Serialize>(&self, entity: &mut E) -> Result<(), MapperError> {
        let resolution = self.resolver.resolve(entity)?;
        if self.config.create_policy == CreatePolicy::EnsureAbsent {
            self.ensure_absent(resolution.key())?;
        }
        entity.set_created_at(self.clock.now());
        let bytes = match encode(&*entity) {
            Ok(bytes) => bytes,
            Err(err) => {
                entity.set_created_at(Timestamp::zero());
                return Err(err);
            }
        };
        match self.store.put(&self.context, resolution.key(), &bytes) {
            Ok(stored) => {
                debug!(key = %stored, "created entity");
                entity.set_key(stored);
                Ok(())
            }
            Err(err) => {
                // No timestamp without a durable write.
                entity.set_created_at(Timestamp::zero());
                Err(MapperError::Store(err))
            }
        }
    }

    /// Create a batch in one client call, batched where the backend
    /// supports it.
    ///
    /// Resolution is sequential and order-preserving. If any entity fails
    /// to resolve (or the batched write fails), every timestamp stamped so
    /// far is reset to zero before the error returns, so no entity carries
    /// a creation timestamp without having been durably written.
    pub fn create_all<E: Entity + Serialize>(&self, entities: &mut [E]) -> Result<(), MapperError> {
        let now = self.clock.now();
        let mut keys = Vec::with_capacity(entities.len());
        let mut failure = None;
        for entity in entities.iter_mut() {
            match self.resolver.resolve(entity) {
                Ok(resolution) => {
                    entity.set_created_at(now);
                    keys.push(resolution.into_key());
                }
                Err(err) => {
                    failure = Some(MapperError::from(err));
                    break;
                }
            }
        }
        let stamped = keys.len();
        if let Some(err) = failure {
            unstamp(&mut entities[..stamped]);
            return Err(err);
        }
        if self.config.create_policy == CreatePolicy::EnsureAbsent {
            for key in &keys {
                if let Err(err) = self.ensure_absent(key) {
                    unstamp(entities);
                    return Err(err);
                }
            }
        }
        let encoded: Result<Vec<_>, MapperError> = entities.iter().map(|e| encode(e)).collect();
        let values = match encoded {
            Ok(values) => values,
            Err(err) => {
                unstamp(entities);
                return Err(err);
            }
        };
        match self.store.put_multi(&self.context, &keys, &values) {
            Ok(stored) => {
                for (entity, key) in entities.iter_mut().zip(stored) {
                    entity.set_key(key);
                }
                debug!(count = entities.len(), "created batch");
                Ok(())
            }
            Err(err) => {
                unstamp(entities);
                Err(MapperError::Store(err))
            }
        }
    }

    /// Overwrite the entity's record. Requires a caller-supplied
    /// identifier; the timestamp is untouched.
    pub fn update<E: Entity + Serialize>(&self, entity: &mut E) -> Result<(), MapperError> {
        let resolution = self.resolver.resolve_for_mutation(entity)?;
        let bytes = encode(&*entity)?;
        let stored = self
            .store
            .put(&self.context, resolution.key(), &bytes)
            .map_err(MapperError::Store)?;
        debug!(key = %stored, "updated entity");
        entity.set_key(stored);
        Ok(())
    }

    /// Overwrite a batch in one client call, batched where the backend
    /// supports it.
    pub fn update_all<E: Entity + Serialize>(&self, entities: &mut [E]) -> Result<(), MapperError> {
        let mut keys = Vec::with_capacity(entities.len());
        for entity in entities.iter_mut() {
            keys.push(self.resolver.resolve_for_mutation(entity)?.into_key());
        }
        let values: Result<Vec<_>, MapperError> = entities.iter().map(|e| encode(e)).collect();
        let stored = self
            .store
            .put_multi(&self.context, &keys, &values?)
            .map_err(MapperError::Store)?;
        for (entity, key) in entities.iter_mut().zip(stored) {
            entity.set_key(key);
        }
        Ok(())
    }

    /// Load the record at the entity's resolved key into the entity.
    ///
    /// Absence surfaces as [`MapperError::NotFound`]; other store errors
    /// pass through unreinterpreted.
    pub fn load<E: Entity + DeserializeOwned>(&self, entity: &mut E) -> Result<(), MapperError> {
        let resolution = self.resolver.resolve_for_mutation(entity)?;
        let bytes = self
            .store
            .get(&self.context, resolution.key())
            .map_err(lift_not_found)?;
        *entity = decode(&bytes)?;
        entity.set_key(resolution.into_key());
        Ok(())
    }

    /// Load a batch. The client interface has no batched read, so this is
    /// one `get` per entity, in order, failing on the first error.
    pub fn load_all<E: Entity + DeserializeOwned>(
        &self,
        entities: &mut [E],
    ) -> Result<(), MapperError> {
        for entity in entities.iter_mut() {
            self.load(entity)?;
        }
        Ok(())
    }

    /// Delete the entity's record. Returns `true` iff a record existed;
    /// absence is an expected outcome, not an error.
    pub fn delete<E: Entity>(&self, entity: &mut E) -> Result<bool, MapperError> {
        let resolution = self.resolver.resolve_for_mutation(entity)?;
        let existed = self
            .store
            .delete(&self.context, resolution.key())
            .map_err(MapperError::Store)?;
        debug!(key = %resolution.key(), existed, "deleted entity");
        Ok(existed)
    }

    /// Delete a batch in one client call, returning how many records
    /// existed. Batched where the backend supports it.
    pub fn delete_all<E: Entity>(&self, entities: &mut [E]) -> Result<u64, MapperError> {
        let mut keys = Vec::with_capacity(entities.len());
        for entity in entities.iter_mut() {
            keys.push(self.resolver.resolve_for_mutation(entity)?.into_key());
        }
        self.store
            .delete_multi(&self.context, &keys)
            .map_err(MapperError::Store)
    }

    /// Hand off a query spec to a lazy executor bound to this mapper's
    /// store and context.
    pub fn query(&self, spec: QuerySpec) -> QueryExecutor<'_, S> {
        QueryExecutor {
            store: &self.store,
            context: &self.context,
            spec,
        }
    }

    fn ensure_absent(&self, key: &Key) -> Result<(), MapperError> {
        if !key.is_complete() {
            // The store allocates a fresh identifier; nothing can pre-exist.
            return Ok(());
        }
        match self.store.get(&self.context, key) {
            Ok(_) => Err(MapperError::AlreadyExists(key.clone())),
            Err(StoreError::NotFound(_)) => Ok(()),
            Err(err) => Err(MapperError::Store(err)),
        }
    }
}

impl<S: StoreClient> std::fmt::Debug for Datastore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Datastore")
            .field("context", &self.context)
            .field("config", &self.config)
            .finish()
    }
}

/// Lazy query handoff: holds the spec and the store context, decodes rows
/// on demand.
pub struct QueryExecutor<'a, S: StoreClient> {
    store: &'a S,
    context: &'a Context,
    spec: QuerySpec,
}

impl<'a, S: StoreClient> QueryExecutor<'a, S> {
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Execute the query and decode every row, writing each row's key onto
    /// the decoded entity.
    pub fn run<E: Entity + DeserializeOwned>(&self) -> Result<Vec<E>, MapperError> {
        let rows = self
            .store
            .run_query(self.context, &self.spec)
            .map_err(MapperError::Store)?;
        rows.into_iter()
            .map(|(key, bytes)| {
                let mut entity: E = decode(&bytes)?;
                entity.set_key(key);
                Ok(entity)
            })
            .collect()
    }
}

fn encode<E: Serialize>(entity: &E) -> Result<Vec<u8>, MapperError> {
    bincode::serialize(entity).map_err(|err| MapperError::Codec(err.to_string()))
}

fn decode<E: DeserializeOwned>(bytes: &[u8]) -> Result<E, MapperError> {
    bincode::deserialize(bytes).map_err(|err| MapperError::Codec(err.to_string()))
}

fn unstamp<E: Entity>(entities: &mut [E]) {
    for entity in entities {
        entity.set_created_at(Timestamp::zero());
    }
}

fn lift_not_found(err: StoreError) -> MapperError {
    match err {
        StoreError::NotFound(key) => MapperError::NotFound(key),
        other => MapperError::Store(other),
    }
}
