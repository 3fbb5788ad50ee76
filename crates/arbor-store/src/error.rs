use arbor_types::{Key, KeyError};

/// Errors from store client operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record exists at the given key.
    #[error("no record at key {0}")]
    NotFound(Key),

    /// A read or delete was attempted with an incomplete key.
    #[error("key {0} has no identifier")]
    IncompleteKey(Key),

    /// Batch put received mismatched key and value counts.
    #[error("batch mismatch: {keys} keys, {values} values")]
    BatchMismatch { keys: usize, values: usize },

    /// Key construction failed at the client boundary.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// I/O error from the underlying backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific transport failure, passed through verbatim.
    ///
    /// Catch-all for external client implementations (RPC stores, wire
    /// protocols) whose failures have no structured variant here; the
    /// in-memory reference backend never constructs it.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
