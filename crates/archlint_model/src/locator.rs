//! Fragment locators.

use serde::{Deserialize, Serialize};

/// Locator of the manifest entry point.
pub const ROOT_LOCATOR: &str = "file:///$root$";

/// Opaque identifier for a document fragment's source.
///
/// Equality is value-based; locators are the dedup key for the document
/// store, the resolver's merged/in-flight sets and the diagnostics
/// collector. Two schemes are understood by the stock fetcher:
/// `file://<workspace-relative path>` and `https://...`. Everything else
/// is passed through untouched and left to the fetcher to reject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    /// Creates a locator from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The locator for the manifest entry point.
    pub fn root() -> Self {
        Self(ROOT_LOCATOR.to_string())
    }

    /// Returns the raw locator string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this locator uses the `file://` scheme.
    pub fn is_file(&self) -> bool {
        self.0.starts_with("file://")
    }

    /// Returns true if this locator uses an HTTP(S) scheme.
    pub fn is_http(&self) -> bool {
        self.0.starts_with("https://") || self.0.starts_with("http://")
    }

    /// The workspace-relative path of a `file://` locator.
    pub fn file_path(&self) -> Option<&str> {
        self.0.strip_prefix("file://")
    }

    /// Resolves a reference found inside the fragment at `self`.
    ///
    /// Absolute references (any scheme prefix) are taken as-is. Relative
    /// references are joined against the directory of the referencing
    /// locator and normalized, so the same target reached via different
    /// paths yields the same locator value. A reference inside a remote
    /// fragment stays on that fragment's origin. `..` segments that
    /// would escape the workspace root (or the remote host root) are
    /// clamped rather than honored.
    pub fn join(&self, reference: &str) -> Locator {
        if reference.contains("://") {
            return Locator::new(reference);
        }

        if self.is_http() {
            return self.join_remote(reference);
        }

        let base_dir = match self.file_path() {
            Some(p) if p != "/$root$" => match p.rsplit_once('/') {
                Some((dir, _)) => dir,
                None => "",
            },
            _ => "",
        };

        Locator::new(format!("file://{}", normalize(base_dir, reference)))
    }

    fn join_remote(&self, reference: &str) -> Locator {
        let (origin, path) = match self.0.find("://") {
            Some(scheme_end) => {
                let after_scheme = scheme_end + 3;
                match self.0[after_scheme..].find('/') {
                    Some(host_end) => self.0.split_at(after_scheme + host_end),
                    None => (self.0.as_str(), ""),
                }
            }
            None => (self.0.as_str(), ""),
        };

        let base_dir = match path.rsplit_once('/') {
            Some((dir, _)) => dir,
            None => "",
        };

        Locator::new(format!("{}/{}", origin, normalize(base_dir, reference)))
    }
}

/// Joins `reference` onto `base_dir` and collapses `.` / `..` segments,
/// clamping at the root.
fn normalize(base_dir: &str, reference: &str) -> String {
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in reference.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Locator {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
