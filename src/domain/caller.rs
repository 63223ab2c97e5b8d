//! Authenticated caller identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, already-verified principal issuing an operation.
///
/// Holds the principal's canonical text encoding. Two callers are the same
/// principal exactly when their encodings are equal, which is what the
/// ownership checks on withdrawal and deletion rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(String);

impl CallerId {
    /// Wraps the canonical text encoding of a principal.
    #[must_use]
    pub fn new(principal: impl Into<String>) -> Self {
        Self(principal.into())
    }

    /// Returns the canonical text encoding.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallerId {
    fn from(principal: &str) -> Self {
        Self(principal.to_string())
    }
}
