//! Per-session document store.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use archlint_model::Locator;

/// Holds raw loaded fragments keyed by locator.
///
/// Append-only during a load session: the first insertion for a locator
/// wins and later ones are ignored, which keeps fragments immutable for
/// the lifetime of the session. A fresh store is constructed per run.
#[derive(Debug, Default)]
pub struct DocumentStore {
    fragments: HashMap<Locator, Value>,
}

impl DocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fragment unless the locator is already resident.
    ///
    /// Returns true if the fragment was inserted.
    pub fn insert(&mut self, locator: Locator, fragment: Value) -> bool {
        if self.fragments.contains_key(&locator) {
            debug!("Fragment already resident, ignoring: {}", locator);
            return false;
        }
        self.fragments.insert(locator, fragment);
        true
    }

    /// Returns the fragment loaded from `locator`, if any.
    pub fn get(&self, locator: &Locator) -> Option<&Value> {
        self.fragments.get(locator)
    }

    /// Returns true if a fragment for `locator` is resident.
    pub fn contains(&self, locator: &Locator) -> bool {
        self.fragments.contains_key(locator)
    }

    /// Number of resident fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns true if no fragments are resident.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
