//! # archlint_core
//!
//! The archlint validation pipeline.
//!
//! One validation run is one session: fresh document store and
//! diagnostics collector, import resolution from the root locator,
//! entity post-processing, dataset construction, concurrent rule
//! evaluation, and aggregation into a [`ValidationReport`]. The
//! [`Validator`] orchestrator owns that sequence and never fails its
//! caller; catastrophic problems become a degenerate report.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use archlint_core::{Validator, WorkspaceFetcher};
//! use archlint_model::Locator;
//! use archlint_rules::{BuiltinEvaluator, builtin_descriptors};
//!
//! let fetcher = WorkspaceFetcher::new("./architecture", "architecture.json")?;
//! let validator = Validator::new(Arc::new(fetcher), Arc::new(BuiltinEvaluator::new()))
//!     .with_builtins(builtin_descriptors());
//! let report = validator.validate(&Locator::root()).await;
//! println!("success: {}", report.success);
//! ```

mod collector;
mod config;
mod engine;
mod error;
mod fetch;
mod postprocess;
mod report;
mod resolver;
mod session;
mod store;
mod validator;

pub use collector::{DiagnosticEntry, DiagnosticKind, DiagnosticsCollector};
pub use config::ValidatorConfig;
pub use engine::{DEFAULT_RULE_TIMEOUT, ValidatorEngine};
pub use error::CoreError;
pub use fetch::{FetchError, FetchFuture, FragmentFetcher, MAX_FRAGMENT_SIZE, WorkspaceFetcher};
pub use postprocess::build_entity_index;
pub use report::{Problem, ValidationReport, ValidationStats, aggregate};
pub use resolver::ImportResolver;
pub use session::Session;
pub use store::DocumentStore;
pub use validator::Validator;

#[cfg(test)]
pub mod test_utils;
