//! Validation session state.

use crate::{DiagnosticEntry, DiagnosticsCollector, DocumentStore};

/// State owned by one validation run.
///
/// Constructing a session is the explicit "start fresh" step: the store
/// and collector begin empty, so nothing bleeds in from a previous run.
/// [`Session::finish`] is the explicit close, yielding the diagnostics
/// for aggregation. Because each run owns its session, concurrent
/// validations in one process are independent.
#[derive(Debug, Default)]
pub struct Session {
    pub(crate) store: DocumentStore,
    pub(crate) collector: DiagnosticsCollector,
}

impl Session {
    /// Starts a fresh session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the loaded fragments.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Number of diagnostics recorded so far.
    pub fn diagnostic_count(&self) -> usize {
        self.collector.len()
    }

    /// Closes the session, yielding its diagnostics.
    pub fn finish(self) -> Vec<DiagnosticEntry> {
        self.collector.into_entries()
    }
}
