//! Actor Addresses
//!
//! Opaque, comparable identifiers for actor mailboxes. Equality and hashing
//! follow the wrapped name only.

use std::fmt;
use std::sync::Arc;

/// Routable identifier for an actor's mailbox
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    name: Arc<str>,
}

impl Address {
    /// Create an address from its name
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
        }
    }

    /// Default name for the `sequence`-th unnamed actor of a class
    pub fn sequenced(class_name: &str, sequence: u64) -> Self {
        Self::new(format!("{}.{}", class_name, sequence))
    }

    /// Raw name, without the display prefix
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorAddr-{}", self.name)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<&str> for Address {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Address {
    fn from(name: String) -> Self {
        Self {
            name: Arc::from(name),
        }
    }
}
