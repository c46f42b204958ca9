//! Load-time diagnostics collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use archlint_rules::DIAGNOSTIC_PREFIX;

/// Kind of load-time problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A fragment could not be fetched (not found, transport failure).
    FetchFailed,

    /// A fragment was fetched but is malformed.
    ParseFailed,

    /// A structurally required section is absent after the merge.
    MissingSection,

    /// The pipeline itself failed; used only by the degenerate report.
    Critical,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::FetchFailed => "fetch-failed",
            Self::ParseFailed => "parse-failed",
            Self::MissingSection => "missing-section",
            Self::Critical => "critical",
        };
        write!(f, "{}", label)
    }
}

/// One load-time problem, keyed by a locator-derived id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticEntry {
    /// Derived id, prefixed so downstream consumers can tell diagnostics
    /// from rule results.
    pub id: String,

    /// Human-readable message.
    pub message: String,

    /// Problem kind.
    pub kind: DiagnosticKind,
}

/// Session-scoped sink for load-time problems.
///
/// Ids are derived from the kind and locator, so repeated failures at
/// the same locator collapse to one entry. A fresh collector is
/// constructed per session; entries are read once by the aggregator.
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    entries: BTreeMap<String, DiagnosticEntry>,
}

impl DiagnosticsCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the stable diagnostic id for a kind/key pair.
    pub fn derive_id(kind: DiagnosticKind, key: &str) -> String {
        let hash = blake3::hash(format!("{:?}:{}", kind, key).as_bytes());
        format!("{}{}", DIAGNOSTIC_PREFIX, &hash.to_hex().as_str()[..16])
    }

    /// Records a problem. Idempotent per kind/key pair.
    pub fn add(&mut self, kind: DiagnosticKind, key: &str, message: impl Into<String>) {
        let id = Self::derive_id(kind, key);
        self.entries.entry(id.clone()).or_insert_with(|| DiagnosticEntry {
            id,
            message: message.into(),
            kind,
        });
    }

    /// Number of recorded problems.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the collector, yielding entries in stable id order.
    pub fn into_entries(self) -> Vec<DiagnosticEntry> {
        self.entries.into_values().collect()
    }
}
