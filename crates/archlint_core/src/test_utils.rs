//! Shared helpers for in-crate tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use archlint_model::Locator;

use crate::fetch::{FetchError, FetchFuture, FragmentFetcher};

/// Fetch counter shared with tests.
pub type FetchCounts = Arc<Mutex<HashMap<Locator, usize>>>;

/// In-memory fetcher for driving the resolver over controlled graphs.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    fragments: HashMap<Locator, String>,
    counts: FetchCounts,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the raw content served for `locator`.
    pub fn with(mut self, locator: Locator, content: impl Into<String>) -> Self {
        self.fragments.insert(locator, content.into());
        self
    }

    /// Handle onto the per-locator fetch counters.
    pub fn counts(&self) -> FetchCounts {
        Arc::clone(&self.counts)
    }
}

impl FragmentFetcher for MemoryFetcher {
    fn fetch(&self, locator: &Locator) -> FetchFuture {
        *self
            .counts
            .lock()
            .unwrap()
            .entry(locator.clone())
            .or_insert(0) += 1;

        let result = match self.fragments.get(locator) {
            Some(content) => Ok(content.clone()),
            None => Err(FetchError::NotFound(format!(
                "no fragment registered for {}",
                locator
            ))),
        };
        Box::pin(async move { result })
    }
}
