//! Static member storage
//!
//! Each Class/AbstractClass record owns one [`StaticContext`]. Reads and
//! writes go straight to the shared map, so a change made through one handle
//! is observed by every other handle immediately.

use parking_lot::RwLock;

use crate::value::{Value, ValueMap};

/// Shared map of a class's static members
#[derive(Debug, Default)]
pub struct StaticContext {
    members: RwLock<ValueMap>,
}

impl StaticContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a member
    pub fn get(&self, name: &str) -> Option<Value> {
        self.members.read().get(name).cloned()
    }

    /// Overwrite an existing member; returns false when it is not declared
    pub fn set(&self, name: &str, value: Value) -> bool {
        match self.members.write().get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Check if a member is declared here
    pub fn contains(&self, name: &str) -> bool {
        self.members.read().contains_key(name)
    }

    /// Declared member names
    pub fn names(&self) -> Vec<String> {
        self.members.read().keys().cloned().collect()
    }

    /// Copy of every member
    pub fn snapshot(&self) -> ValueMap {
        self.members.read().clone()
    }

    /// Replace the whole member set
    pub(crate) fn replace(&self, members: ValueMap) {
        *self.members.write() = members;
    }
}
