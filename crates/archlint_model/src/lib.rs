//! # archlint_model
//!
//! Document model for the archlint manifest validator.
//!
//! This crate provides:
//! - [`Locator`]: the opaque identifier for a document fragment source
//! - [`DocPath`] and tree helpers for walking and patching fragment trees
//! - [`EntityIndex`] and [`DatasetView`]: the derived, read-only query
//!   surface handed to rule evaluation
//!
//! A manifest is a tree of scalars, sequences and mappings. Cross-file
//! imports are expressed as `{"$import": "<reference>"}` nodes anywhere in
//! the tree; the resolver substitutes the referenced fragment in place.

mod dataset;
mod document;
mod locator;

pub use dataset::{DatasetView, EntityEntry, EntityIndex};
pub use document::{DocPath, ImportRef, ManifestInfo, PathSegment, scan_imports, substitute};
pub use locator::{Locator, ROOT_LOCATOR};

/// Key that marks an import directive inside a fragment.
pub const IMPORT_KEY: &str = "$import";

/// Top-level section holding entity declarations.
pub const ELEMENTS_SECTION: &str = "elements";

/// Dotted path to the custom validator table inside a merged manifest.
pub const VALIDATORS_PATH: [&str; 2] = ["rules", "validators"];
