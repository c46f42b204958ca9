//! Pipeline error types.

use thiserror::Error;

/// Errors that can occur during a validation run.
///
/// Load-time problems are diagnostics, not errors; only failures that
/// make the run itself unusable surface here, and the orchestrator
/// converts them to a degenerate report at its boundary.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Workspace precondition failed (e.g. directory does not exist).
    #[error("Workspace error: {0}")]
    Workspace(String),

    /// The root document could not be fetched or parsed.
    #[error("Root document unavailable: {0}")]
    RootUnavailable(String),

    /// Derived-structure computation failed on a structurally unusable
    /// manifest.
    #[error("Post-processing failed: {0}")]
    PostProcess(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a workspace precondition error.
    pub fn workspace(message: impl Into<String>) -> Self {
        Self::Workspace(message.into())
    }

    /// Creates a post-processing error.
    pub fn post_process(message: impl Into<String>) -> Self {
        Self::PostProcess(message.into())
    }
}
