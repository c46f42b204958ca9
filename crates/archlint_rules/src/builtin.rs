//! Stock rule evaluator supplied by the hosting environment.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde_json::Value;

use archlint_model::DatasetView;

use crate::{EvalError, EvalFuture, RuleEvaluator, RuleItem};

static KEBAB_CASE: OnceLock<Regex> = OnceLock::new();

fn kebab_case() -> &'static Regex {
    KEBAB_CASE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("kebab pattern"))
}

/// The evaluator shipped with the archlint CLI.
///
/// Understands two expression families, plus `builtin:` aliases for the
/// checks the metamodel enables by default:
///
/// - `missing-field:<field>[:<kind>]` — elements (optionally restricted
///   to one kind) that do not declare `<field>`
/// - `id-pattern:<regex>` — element ids that do not match the pattern
/// - `builtin:element-id-kebab-case`
/// - `builtin:element-description-present`
/// - `builtin:relations-resolved` — relations pointing at undeclared ids
///
/// Anything else is an [`EvalError::UnknownExpression`], which the engine
/// records on the rule's result without affecting other rules.
#[derive(Debug, Default)]
pub struct BuiltinEvaluator;

impl BuiltinEvaluator {
    /// Creates the stock evaluator.
    pub fn new() -> Self {
        Self
    }

    fn run(expression: &str, dataset: &DatasetView) -> Result<Vec<RuleItem>, EvalError> {
        if let Some(rest) = expression.strip_prefix("missing-field:") {
            let (field, kind) = match rest.split_once(':') {
                Some((field, kind)) => (field, Some(kind)),
                None => (rest, None),
            };
            if field.is_empty() {
                return Err(EvalError::InvalidExpression {
                    expression: expression.to_string(),
                    message: "empty field name".to_string(),
                });
            }
            return Ok(missing_field(dataset, field, kind));
        }

        if let Some(pattern) = expression.strip_prefix("id-pattern:") {
            let regex = Regex::new(pattern).map_err(|e| EvalError::InvalidExpression {
                expression: expression.to_string(),
                message: e.to_string(),
            })?;
            return Ok(id_pattern(dataset, &regex));
        }

        match expression {
            "builtin:element-id-kebab-case" => Ok(id_pattern(dataset, kebab_case())),
            "builtin:element-description-present" => Ok(missing_field(dataset, "description", None)),
            "builtin:relations-resolved" => Ok(relations_resolved(dataset)),
            other => Err(EvalError::UnknownExpression(other.to_string())),
        }
    }
}

impl RuleEvaluator for BuiltinEvaluator {
    fn evaluate(&self, expression: &str, dataset: Arc<DatasetView>) -> EvalFuture {
        let expression = expression.to_string();
        Box::pin(async move { Self::run(&expression, &dataset) })
    }
}

/// The built-in rule set the hosting environment enables by default.
pub fn builtin_descriptors() -> Vec<crate::RuleDescriptor> {
    vec![
        crate::RuleDescriptor::new(
            "element-id-kebab-case",
            "Element ids use kebab-case",
            "builtin:element-id-kebab-case",
        ),
        crate::RuleDescriptor::new(
            "element-description-present",
            "Every element has a description",
            "builtin:element-description-present",
        ),
        crate::RuleDescriptor::new(
            "relations-resolved",
            "Relations reference declared elements",
            "builtin:relations-resolved",
        ),
    ]
}

fn element_location(dataset: &DatasetView, id: &str) -> String {
    dataset
        .index()
        .entities
        .get(id)
        .map(|e| e.location.clone())
        .unwrap_or_else(|| format!("elements.{}", id))
}

fn missing_field(dataset: &DatasetView, field: &str, kind: Option<&str>) -> Vec<RuleItem> {
    dataset
        .elements()
        .filter(|(_, def)| match kind {
            Some(k) => def.get("kind").and_then(Value::as_str) == Some(k),
            None => true,
        })
        .filter(|(_, def)| {
            !def.get(field)
                .is_some_and(|v| !v.is_null() && v.as_str() != Some(""))
        })
        .map(|(id, _)| {
            RuleItem::new(
                format!("missing-{}-{}", field, id),
                format!("Element '{}' has no {}", id, field),
                element_location(dataset, id),
            )
            .with_correction(format!("Declare a '{}' for '{}'", field, id))
        })
        .collect()
}

fn id_pattern(dataset: &DatasetView, regex: &Regex) -> Vec<RuleItem> {
    dataset
        .elements()
        .filter(|(id, _)| !regex.is_match(id))
        .map(|(id, _)| {
            RuleItem::new(
                format!("id-pattern-{}", id),
                format!("Element id '{}' does not match '{}'", id, regex.as_str()),
                element_location(dataset, id),
            )
            .with_description(format!(
                "Element ids must match the pattern '{}'",
                regex.as_str()
            ))
        })
        .collect()
}

fn relations_resolved(dataset: &DatasetView) -> Vec<RuleItem> {
    let mut items = Vec::new();
    for (id, def) in dataset.elements() {
        let Some(relations) = def.get("relations").and_then(Value::as_array) else {
            continue;
        };
        for (index, relation) in relations.iter().enumerate() {
            let Some(target) = relation.get("ref").and_then(Value::as_str) else {
                continue;
            };
            if !dataset.index().entities.contains_key(target) {
                items.push(
                    RuleItem::new(
                        format!("dangling-{}-{}", id, index),
                        format!("Relation from '{}' points at undeclared '{}'", id, target),
                        format!("{}.relations[{}]", element_location(dataset, id), index),
                    )
                    .with_cause(format!("'{}' is not declared under elements", target)),
                );
            }
        }
    }
    items
}
