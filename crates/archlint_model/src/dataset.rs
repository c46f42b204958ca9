//! Derived structures and the rule-evaluation query surface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ELEMENTS_SECTION;

/// Index entry for one declared entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityEntry {
    /// Entity kind (`component`, `context`, `aspect`, ...), if declared.
    pub kind: Option<String>,

    /// Dotted location of the entity in the merged manifest.
    pub location: String,
}

/// Secondary structures derived from the merged manifest.
///
/// Built exactly once per session, after resolution completes. BTreeMaps
/// keep iteration deterministic for rule evaluation and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityIndex {
    /// Entity id to index entry.
    pub entities: BTreeMap<String, EntityEntry>,

    /// Reverse-reference map: target entity id to referencing entity ids.
    pub reverse_refs: BTreeMap<String, Vec<String>>,
}

impl EntityIndex {
    /// Entity ids that reference `target` through a relation.
    pub fn referenced_by(&self, target: &str) -> &[String] {
        self.reverse_refs
            .get(target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Read-only projection of one resolved manifest, shared across rule
/// evaluations.
///
/// Pure function of its inputs; rules must not (and cannot) mutate it.
#[derive(Debug, Clone)]
pub struct DatasetView {
    manifest: Value,
    index: EntityIndex,
    role: Option<String>,
}

impl DatasetView {
    /// Builds the dataset view for one validation run.
    pub fn build(manifest: Value, index: EntityIndex, role: Option<String>) -> Self {
        Self {
            manifest,
            index,
            role,
        }
    }

    /// The merged manifest tree.
    pub fn manifest(&self) -> &Value {
        &self.manifest
    }

    /// The derived entity index.
    pub fn index(&self) -> &EntityIndex {
        &self.index
    }

    /// The active role for this invocation, if any.
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Iterates over declared elements as `(id, definition)` pairs.
    ///
    /// Null definitions (placeholders left behind by an unresolved or
    /// deduplicated import) are not elements and are skipped. When a role
    /// is active, elements declaring a `roles` list that does not contain
    /// it are scoped out of the view.
    pub fn elements(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.manifest
            .get(ELEMENTS_SECTION)
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|m| m.iter())
            .filter(|(_, def)| !def.is_null() && self.visible_to_role(def))
            .map(|(id, def)| (id.as_str(), def))
    }

    /// Looks up a single element definition by id.
    pub fn element(&self, id: &str) -> Option<&Value> {
        self.manifest
            .get(ELEMENTS_SECTION)
            .and_then(|e| e.get(id))
            .filter(|def| !def.is_null() && self.visible_to_role(def))
    }

    fn visible_to_role(&self, def: &Value) -> bool {
        let Some(role) = self.role.as_deref() else {
            return true;
        };
        match def.get("roles").and_then(Value::as_array) {
            Some(roles) => roles.iter().any(|r| r.as_str() == Some(role)),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_view(role: Option<&str>) -> DatasetView {
        let manifest = json!({
            "elements": {
                "checkout": {"kind": "component", "roles": ["web"]},
                "billing": {"kind": "context"},
            }
        });
        DatasetView::build(manifest, EntityIndex::default(), role.map(str::to_string))
    }

    #[test]
    fn test_elements_without_role() {
        let view = sample_view(None);
        let ids: Vec<&str> = view.elements().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["billing", "checkout"]);
    }

    #[test]
    fn test_role_scopes_elements() {
        let view = sample_view(Some("batch"));
        let ids: Vec<&str> = view.elements().map(|(id, _)| id).collect();
        // billing declares no roles list and stays visible; checkout is scoped out.
        assert_eq!(ids, vec!["billing"]);
        assert!(view.element("checkout").is_none());
        assert!(view.element("billing").is_some());
    }

    #[test]
    fn test_referenced_by_missing_target() {
        let index = EntityIndex::default();
        assert!(index.referenced_by("unknown").is_empty());
    }
}
