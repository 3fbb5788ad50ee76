use std::collections::HashMap;
use std::sync::RwLock;

use arbor_types::{Id, Key};
use tracing::debug;

use crate::context::Context;
use crate::error::{StoreError, StoreResult};
use crate::query::QuerySpec;
use crate::traits::StoreClient;

/// In-memory, HashMap-based store backend.
///
/// Intended for tests and embedding. Records are held behind a `RwLock`
/// for safe concurrent access and cloned on read/write. Identifier
/// allocation is a per-kind counter starting at 1. The backend is
/// namespace-agnostic: it ignores the context's namespace and deadline.
pub struct InMemoryStore {
    inner: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    records: HashMap<Key, Vec<u8>>,
    counters: HashMap<String, i64>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState::default()),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").records.len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").records.is_empty()
    }

    /// Remove all records and reset identifier counters.
    pub fn clear(&self) {
        let mut state = self.inner.write().expect("lock poisoned");
        state.records.clear();
        state.counters.clear();
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreClient for InMemoryStore {
    fn put(&self, _ctx: &Context, key: &Key, value: &[u8]) -> StoreResult<Key> {
        let mut state = self.inner.write().expect("lock poisoned");
        let stored_key = if key.is_complete() {
            key.clone()
        } else {
            let counter = state.counters.entry(key.kind().to_string()).or_insert(0);
            *counter += 1;
            let allocated = key.with_id(Id::Int(*counter));
            debug!(key = %allocated, "allocated identifier");
            allocated
        };
        state.records.insert(stored_key.clone(), value.to_vec());
        Ok(stored_key)
    }

    fn get(&self, _ctx: &Context, key: &Key) -> StoreResult<Vec<u8>> {
        if !key.is_complete() {
            return Err(StoreError::IncompleteKey(key.clone()));
        }
        let state = self.inner.read().expect("lock poisoned");
        state
            .records
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }

    fn delete(&self, _ctx: &Context, key: &Key) -> StoreResult<bool> {
        if !key.is_complete() {
            return Err(StoreError::IncompleteKey(key.clone()));
        }
        let mut state = self.inner.write().expect("lock poisoned");
        Ok(state.records.remove(key).is_some())
    }

    fn delete_multi(&self, _ctx: &Context, keys: &[Key]) -> StoreResult<u64> {
        // Validate up front so a bad key cannot leave the batch half-deleted.
        if let Some(incomplete) = keys.iter().find(|key| !key.is_complete()) {
            return Err(StoreError::IncompleteKey(incomplete.clone()));
        }
        let mut state = self.inner.write().expect("lock poisoned");
        let mut removed = 0;
        for key in keys {
            if state.records.remove(key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn run_query(&self, _ctx: &Context, spec: &QuerySpec) -> StoreResult<Vec<(Key, Vec<u8>)>> {
        let state = self.inner.read().expect("lock poisoned");
        let mut rows: Vec<(Key, Vec<u8>)> = state
            .records
            .iter()
            .filter(|(key, _)| key.kind() == spec.kind_name())
            .filter(|(key, _)| match spec.ancestor_key() {
                Some(ancestor) => *key == ancestor || ancestor.is_ancestor_of(key),
                None => true,
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        // Stable order so callers see reproducible results.
        rows.sort_by_key(|(key, _)| key.to_string());
        if let Some(limit) = spec.limit_hint() {
            rows.truncate(limit);
        }
        Ok(rows)
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("record_count", &self.len())
            .finish()
    }
}
