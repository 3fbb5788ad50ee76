use arbor_store::StoreError;
use arbor_types::{Key, KeyError};
use thiserror::Error;

/// Errors produced by metadata extraction and key resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A string identifier field holds the empty string.
    #[error("missing string identifier in field `{field}`")]
    MissingStringId { field: String },

    /// An integer identifier field holds zero.
    #[error("missing integer identifier in field `{field}`")]
    MissingIntId { field: String },

    /// The schema produced both a string and an integer identifier. This
    /// is a configuration error in the entity declaration, not bad data.
    #[error("entity declares both string and integer identifiers")]
    MultipleIdFields,

    /// The schema declares `has_parent` but the entity instance carries no
    /// parent key.
    #[error("entity requires a parent key but none is set")]
    MissingParentKey,

    /// A mutation operation resolved to a store-allocated key. Only create
    /// may leave identifier allocation to the store.
    #[error("operation requires a caller-supplied identifier; key would be auto-generated")]
    MissingAutoGeneratedKey,

    /// A field annotated as the identifier has a type the engine cannot
    /// use as one.
    #[error("field `{field}` cannot serve as an identifier")]
    UnsupportedIdField { field: String },

    /// Key assembly failed.
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Errors surfaced by the [`Datastore`](crate::Datastore) facade.
///
/// Store transport errors pass through verbatim under [`MapperError::Store`];
/// only the store's not-found signal is lifted into its own variant so
/// callers can match on it without reaching into the client's error type.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The store holds no record at the resolved key.
    #[error("no entity at key {0}")]
    NotFound(Key),

    /// Create found a pre-existing record at the resolved key. Only raised
    /// under [`CreatePolicy::EnsureAbsent`](crate::CreatePolicy).
    #[error("entity already exists at key {0}")]
    AlreadyExists(Key),

    /// Entity payload could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
