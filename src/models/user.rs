//! Authenticated user identity
//!
//! Spendwise does not authenticate anyone itself. Whoever calls into the
//! services hands over the identity it has already verified, and every
//! transaction and budget is scoped to it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the user that owns transactions and budgets
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user ID, trimming surrounding whitespace
    ///
    /// Returns `None` for an empty or whitespace-only identifier.
    pub fn new(id: impl AsRef<str>) -> Option<Self> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            None
        } else {
            Some(Self(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
