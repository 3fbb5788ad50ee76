use std::sync::Arc;

use arbor_types::{Id, Key};

use crate::context::Context;
use crate::error::{StoreError, StoreResult};
use crate::query::QuerySpec;

/// Client boundary to a hierarchical key-value store.
///
/// All implementations must satisfy these invariants:
/// - `put` with an incomplete key allocates an identifier and returns the
///   completed key; the caller must adopt the returned key.
/// - `get` distinguishes absence (`StoreError::NotFound`) from transport
///   failure.
/// - Payloads are opaque bytes; the store never interprets record contents.
/// - The [`Context`] is passed through unmodified on every call; deadlines
///   and namespace scoping are the implementation's responsibility.
pub trait StoreClient: Send + Sync {
    /// Write a record, returning the (possibly newly completed) key.
    fn put(&self, ctx: &Context, key: &Key, value: &[u8]) -> StoreResult<Key>;

    /// Read the record at a key.
    ///
    /// Returns `StoreError::NotFound` if no record exists.
    fn get(&self, ctx: &Context, key: &Key) -> StoreResult<Vec<u8>>;

    /// Delete the record at a key. Returns `true` iff a record existed.
    fn delete(&self, ctx: &Context, key: &Key) -> StoreResult<bool>;

    /// Execute a query spec, returning matching records with their keys.
    fn run_query(&self, ctx: &Context, spec: &QuerySpec) -> StoreResult<Vec<(Key, Vec<u8>)>>;

    /// Write multiple records in one round trip, preserving order.
    ///
    /// Default implementation calls `put()` per record. Backends may
    /// override to batch (e.g., one RPC for the whole slice).
    fn put_multi(&self, ctx: &Context, keys: &[Key], values: &[Vec<u8>]) -> StoreResult<Vec<Key>> {
        if keys.len() != values.len() {
            return Err(StoreError::BatchMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        keys.iter()
            .zip(values)
            .map(|(key, value)| self.put(ctx, key, value))
            .collect()
    }

    /// Delete multiple records, returning how many existed.
    ///
    /// Default implementation calls `delete()` per key.
    fn delete_multi(&self, ctx: &Context, keys: &[Key]) -> StoreResult<u64> {
        let mut removed = 0;
        for key in keys {
            if self.delete(ctx, key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Construct a key through the client boundary.
    ///
    /// Default implementation builds the key locally; backends that mint
    /// keys remotely (e.g., namespace-qualified) may override.
    fn new_key(
        &self,
        _ctx: &Context,
        kind: &str,
        id: Id,
        parent: Option<Key>,
    ) -> StoreResult<Key> {
        let key = match parent {
            Some(parent) => Key::with_parent(kind, id, parent)?,
            None => Key::new(kind, id)?,
        };
        Ok(key)
    }
}

impl<S: StoreClient + ?Sized> StoreClient for Arc<S> {
    fn put(&self, ctx: &Context, key: &Key, value: &[u8]) -> StoreResult<Key> {
        (**self).put(ctx, key, value)
    }

    fn get(&self, ctx: &Context, key: &Key) -> StoreResult<Vec<u8>> {
        (**self).get(ctx, key)
    }

    fn delete(&self, ctx: &Context, key: &Key) -> StoreResult<bool> {
        (**self).delete(ctx, key)
    }

    fn run_query(&self, ctx: &Context, spec: &QuerySpec) -> StoreResult<Vec<(Key, Vec<u8>)>> {
        (**self).run_query(ctx, spec)
    }

    fn put_multi(&self, ctx: &Context, keys: &[Key], values: &[Vec<u8>]) -> StoreResult<Vec<Key>> {
        (**self).put_multi(ctx, keys, values)
    }

    fn delete_multi(&self, ctx: &Context, keys: &[Key]) -> StoreResult<u64> {
        (**self).delete_multi(ctx, keys)
    }

    fn new_key(&self, ctx: &Context, kind: &str, id: Id, parent: Option<Key>) -> StoreResult<Key> {
        (**self).new_key(ctx, kind, id, parent)
    }
}
