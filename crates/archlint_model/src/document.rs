//! Fragment tree helpers.
//!
//! Fragments and the merged manifest are plain [`serde_json::Value`]
//! trees. The resolver records positions inside the merged tree as
//! [`DocPath`] values and patches nodes in place with [`substitute`];
//! [`scan_imports`] finds the import directives of a freshly merged
//! subtree.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ELEMENTS_SECTION, IMPORT_KEY};

/// One step into a document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Mapping key.
    Key(String),
    /// Sequence index.
    Index(usize),
}

/// Position of a node inside the merged manifest.
///
/// Substitution replaces nodes in place and never removes them, so a
/// recorded path stays valid while sibling branches are patched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocPath(Vec<PathSegment>);

impl DocPath {
    /// The root of the document.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns true if this path addresses the document root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Extends the path by one mapping key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// Extends the path by one sequence index.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// Renders the path as a dotted location string (e.g. `elements.checkout`).
    pub fn to_location(&self) -> String {
        let mut out = String::new();
        for segment in &self.0 {
            match segment {
                PathSegment::Key(k) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(k);
                }
                PathSegment::Index(i) => {
                    out.push_str(&format!("[{}]", i));
                }
            }
        }
        out
    }

    fn lookup_mut<'a>(&self, doc: &'a mut Value) -> Option<&'a mut Value> {
        let mut node = doc;
        for segment in &self.0 {
            node = match segment {
                PathSegment::Key(k) => node.get_mut(k.as_str())?,
                PathSegment::Index(i) => node.get_mut(*i)?,
            };
        }
        Some(node)
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_location())
    }
}

/// An import directive found during a subtree scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRef {
    /// The raw reference string, as written in the fragment.
    pub reference: String,
    /// Position of the directive node in the merged document.
    pub path: DocPath,
}

/// Replaces the node at `path` with `replacement`.
///
/// An empty path replaces the whole document. Returns false if the path
/// no longer addresses a node (the merged tree changed shape underneath,
/// which the resolver treats as a defect of the fragment, not a panic).
pub fn substitute(doc: &mut Value, path: &DocPath, replacement: Value) -> bool {
    match path.lookup_mut(doc) {
        Some(node) => {
            *node = replacement;
            true
        }
        None => false,
    }
}

/// Scans the subtree rooted at `path` for import directives.
///
/// A directive is a mapping whose `$import` entry is a string. The
/// directive node itself is not descended into; it will be replaced
/// wholesale once its target settles.
pub fn scan_imports(doc: &Value, path: &DocPath) -> Vec<ImportRef> {
    let mut found = Vec::new();
    let mut root = path.clone();
    let node = {
        // Immutable walk along the same segments as lookup_mut.
        let mut node = doc;
        for segment in &root.0 {
            node = match segment {
                PathSegment::Key(k) => match node.get(k.as_str()) {
                    Some(n) => n,
                    None => return found,
                },
                PathSegment::Index(i) => match node.get(*i) {
                    Some(n) => n,
                    None => return found,
                },
            };
        }
        node
    };
    scan_node(node, &mut root, &mut found);
    found
}

fn scan_node(node: &Value, path: &mut DocPath, found: &mut Vec<ImportRef>) {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get(IMPORT_KEY) {
                found.push(ImportRef {
                    reference: reference.clone(),
                    path: path.clone(),
                });
                return;
            }
            for (key, child) in map {
                path.0.push(PathSegment::Key(key.clone()));
                scan_node(child, path, found);
                path.0.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.0.push(PathSegment::Index(index));
                scan_node(child, path, found);
                path.0.pop();
            }
        }
        _ => {}
    }
}

/// Identifying information about a merged manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestInfo {
    /// Manifest name, if declared.
    pub name: Option<String>,

    /// Manifest version, if declared.
    pub version: Option<String>,

    /// Number of declared elements.
    pub element_count: usize,
}

impl ManifestInfo {
    /// Extracts identifying information from a merged manifest.
    pub fn from_manifest(manifest: &Value) -> Self {
        let meta = manifest.get("manifest");
        let string_field = |field: &str| {
            meta.and_then(|m| m.get(field))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        // Null placeholders from unresolved imports are not elements.
        let element_count = manifest
            .get(ELEMENTS_SECTION)
            .and_then(Value::as_object)
            .map(|m| m.values().filter(|v| !v.is_null()).count())
            .unwrap_or(0);

        Self {
            name: string_field("name"),
            version: string_field("version"),
            element_count,
        }
    }

    /// Placeholder info for a run where no manifest could be merged.
    pub fn unavailable() -> Self {
        Self {
            name: None,
            version: None,
            element_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_doc_path_location() {
        let path = DocPath::root().key("elements").key("checkout").key("relations").index(1);
        assert_eq!(path.to_location(), "elements.checkout.relations[1]");
    }

    #[test]
    fn test_substitute_at_root() {
        let mut doc = json!(null);
        assert!(substitute(&mut doc, &DocPath::root(), json!({"a": 1})));
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn test_substitute_nested() {
        let mut doc = json!({"elements": {"a": {"$import": "x.json"}}});
        let path = DocPath::root().key("elements").key("a");
        assert!(substitute(&mut doc, &path, json!({"kind": "component"})));
        assert_eq!(doc, json!({"elements": {"a": {"kind": "component"}}}));
    }

    #[test]
    fn test_substitute_stale_path() {
        let mut doc = json!({"a": 1});
        let path = DocPath::root().key("gone");
        assert!(!substitute(&mut doc, &path, json!(2)));
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn test_scan_imports_finds_nested_directives() {
        let doc = json!({
            "elements": {
                "billing": {"$import": "services/billing.json"},
                "inline": {"kind": "component"}
            },
            "extra": [{"$import": "aspects.json"}]
        });

        let mut found = scan_imports(&doc, &DocPath::root());
        found.sort_by(|a, b| a.reference.cmp(&b.reference));

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].reference, "aspects.json");
        assert_eq!(found[0].path.to_location(), "extra[0]");
        assert_eq!(found[1].reference, "services/billing.json");
        assert_eq!(found[1].path.to_location(), "elements.billing");
    }

    #[test]
    fn test_scan_imports_does_not_descend_into_directive() {
        // A directive node may carry sibling keys; nothing inside it is scanned.
        let doc = json!({"a": {"$import": "x.json", "nested": {"$import": "y.json"}}});
        let found = scan_imports(&doc, &DocPath::root());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reference, "x.json");
    }

    #[test]
    fn test_scan_imports_scoped_to_subtree() {
        let doc = json!({
            "left": {"$import": "left.json"},
            "right": {"$import": "right.json"}
        });
        let found = scan_imports(&doc, &DocPath::root().key("right"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reference, "right.json");
        assert_eq!(found[0].path.to_location(), "right");
    }

    #[test]
    fn test_manifest_info_extraction() {
        let manifest = json!({
            "manifest": {"name": "shop", "version": "2.1"},
            "elements": {"checkout": {}, "billing": {}}
        });
        let info = ManifestInfo::from_manifest(&manifest);
        assert_eq!(info.name.as_deref(), Some("shop"));
        assert_eq!(info.version.as_deref(), Some("2.1"));
        assert_eq!(info.element_count, 2);
    }

    #[test]
    fn test_manifest_info_missing_sections() {
        let info = ManifestInfo::from_manifest(&json!({}));
        assert_eq!(info, ManifestInfo::unavailable());
    }
}
