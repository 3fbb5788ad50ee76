use thiserror::Error;

/// Errors produced by key construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    /// A key was built with an empty kind.
    #[error("key kind must not be empty")]
    EmptyKind,

    /// A key was built with an incomplete parent. Ancestors must carry a
    /// concrete identifier before children can hang off them.
    #[error("parent key {0} is incomplete")]
    IncompleteParent(String),
}
