//! Metadata-driven key resolution and CRUD mapping for Arbor.
//!
//! This crate is the heart of Arbor. Entities declare, through annotated
//! field descriptors, which logical collection they belong to, which field
//! identifies them, and whether they require an ancestor. From those
//! declarations the engine derives a canonical [`arbor_types::Key`] and
//! performs CRUD operations against an [`arbor_store::StoreClient`].
//!
//! It provides:
//! - The [`Entity`] contract and the abstract field-descriptor views
//!   extractors operate against
//! - [`Metadata`] — the per-resolve accumulator
//! - [`MetadataExtractor`] variants and the ordered [`ExtractorChain`]
//! - [`KeyResolver`] — invariant enforcement and key assembly
//! - [`Datastore`] — the CRUD facade with batch rollback semantics
//!
//! The resolver distinguishes two paths: `resolve` (creates; tolerates
//! store-allocated identifiers) and `resolve_for_mutation` (loads, updates,
//! deletes; requires a caller-supplied identifier). That asymmetry is the
//! central policy of the engine.

pub mod entity;
pub mod error;
pub mod extract;
pub mod mapper;
pub mod metadata;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use entity::{Entity, EntityView, FieldValue, FieldView};
pub use error::{MapperError, ResolveError};
pub use extract::{
    ExtractorChain, HasParentExtractor, IdExtractor, KindExtractor, MetadataExtractor,
};
pub use mapper::{CreatePolicy, Datastore, DatastoreConfig, QueryExecutor};
pub use metadata::Metadata;
pub use resolver::{KeyResolver, Resolution};
