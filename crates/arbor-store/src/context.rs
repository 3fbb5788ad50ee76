use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session object threaded through every store client call.
///
/// The mapping engine passes the context through unmodified; namespace
/// scoping and deadline enforcement belong to the client implementation.
/// Serializable so remote backends can forward it with each request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    namespace: Option<String>,
    deadline: Option<Duration>,
}

impl Context {
    /// A context with no namespace and no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Scope all operations under the given namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Bound each store round trip by the given deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}
