//! Store client boundary for Arbor.
//!
//! This crate defines the narrow interface the mapping engine talks to a
//! backing key-value store through:
//! - [`StoreClient`] — put / get / delete (and batch variants), query
//!   execution, and key construction
//! - [`Context`] — the session object threaded through every client call
//! - [`QuerySpec`] — kind + ancestor + limit query description
//! - [`InMemoryStore`] — reference backend for tests and embedding
//!
//! The engine never interprets store payloads; records cross this boundary
//! as opaque byte vectors keyed by [`arbor_types::Key`].

pub mod context;
pub mod error;
pub mod memory;
pub mod query;
pub mod traits;

pub use context::Context;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use query::QuerySpec;
pub use traits::StoreClient;
