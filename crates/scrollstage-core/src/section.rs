#![forbid(unsafe_code)]

//! Section identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a tracked page section.
///
/// Identity is the string itself; uniqueness across a tracked set is an
/// invariant enforced at registration time, not here. The id never owns the
/// underlying layout region — it is a lookup key that the host resolves to a
/// mounted element, which may come and go independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Create a section id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
