//! Rule descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use archlint_model::VALIDATORS_PATH;

/// A named, declarative check evaluated against the merged manifest.
///
/// Built-in descriptors come from the hosting environment; custom ones
/// are declared inside the manifest under `rules.validators.<id>` as
/// `{"title": ..., "do": "<expression>"}`. The expression grammar is
/// owned entirely by the injected evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    /// Rule id, unique within a run.
    pub id: String,

    /// Human-readable title.
    pub title: String,

    /// Evaluator expression.
    pub expression: String,
}

impl RuleDescriptor {
    /// Creates a descriptor.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            expression: expression.into(),
        }
    }
}

/// Reads custom rule descriptors from a merged manifest.
///
/// Declarations missing a `do` expression are skipped; a missing `title`
/// falls back to the rule id. Returned in declaration-table order.
pub fn custom_rules(manifest: &Value) -> Vec<RuleDescriptor> {
    let mut node = manifest;
    for key in VALIDATORS_PATH {
        match node.get(key) {
            Some(next) => node = next,
            None => return Vec::new(),
        }
    }

    let Some(table) = node.as_object() else {
        return Vec::new();
    };

    table
        .iter()
        .filter_map(|(id, decl)| {
            let expression = decl.get("do")?.as_str()?;
            let title = decl
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or(id.as_str());
            Some(RuleDescriptor::new(id, title, expression))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_custom_rules_extraction() {
        let manifest = json!({
            "rules": {
                "validators": {
                    "all-described": {
                        "title": "Every element is described",
                        "do": "missing-field:description"
                    },
                    "no-title": {"do": "id-pattern:^[a-z]+$"},
                    "no-expression": {"title": "ignored"}
                }
            }
        });

        let rules = custom_rules(&manifest);
        assert_eq!(
            rules,
            vec![
                RuleDescriptor::new(
                    "all-described",
                    "Every element is described",
                    "missing-field:description"
                ),
                RuleDescriptor::new("no-title", "no-title", "id-pattern:^[a-z]+$"),
            ]
        );
    }

    #[test]
    fn test_custom_rules_missing_section() {
        assert!(custom_rules(&json!({})).is_empty());
        assert!(custom_rules(&json!({"rules": {}})).is_empty());
        assert!(custom_rules(&json!({"rules": {"validators": []}})).is_empty());
    }
}
