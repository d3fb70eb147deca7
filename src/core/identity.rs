//! # Short random identifiers.
//!
//! [`new_id`] produces a 10-character alphanumeric token. Collisions are
//! practically negligible for in-process use but not cryptographically ruled out.
//! Tokens identify subscribers and lingering entries.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use rand::distr::Alphanumeric;

const ID_LEN: usize = 10;

/// Returns a fresh short token.
pub fn new_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

/// Identity of a subscribing entity. Cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SubscriberId(Arc<str>);

impl SubscriberId {
    /// Generates a new random identity.
    pub fn generate() -> Self {
        Self(new_id().into())
    }

    /// Returns the token as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SubscriberId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for SubscriberId {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriberId({})", self.0)
    }
}
