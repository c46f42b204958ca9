//! Rule evaluation outcomes.

use serde::{Deserialize, Serialize};

/// Id prefix marking a result or problem as a load-time diagnostic.
///
/// Results carrying this prefix are excluded from pass/fail computation
/// and from the validation-error count; they describe loading problems,
/// not rule violations.
pub const DIAGNOSTIC_PREFIX: &str = "diagnostic:";

/// One issue reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleItem {
    /// Unique id of the issue within its rule result.
    pub uid: String,

    /// Short human-readable title.
    pub title: String,

    /// Dotted location of the offending node in the merged manifest.
    pub location: String,

    /// Longer description of the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Suggested correction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,

    /// Underlying cause, when the issue is a symptom of another defect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl RuleItem {
    /// Creates an item with the required fields.
    pub fn new(
        uid: impl Into<String>,
        title: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            title: title.into(),
            location: location.into(),
            description: None,
            correction: None,
            cause: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the suggested correction.
    pub fn with_correction(mut self, correction: impl Into<String>) -> Self {
        self.correction = Some(correction.into());
        self
    }

    /// Sets the underlying cause.
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

/// The outcome of evaluating one rule.
///
/// A rule either terminates with zero or more items (empty means "no
/// issues") or abnormally with `error` populated. Items produced before
/// an abnormal end are kept for diagnosis but the result counts as
/// failed evaluation either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    /// Rule id.
    pub id: String,

    /// Rule title.
    pub title: String,

    /// Issues found by the rule.
    pub items: Vec<RuleItem>,

    /// Evaluation error, when the rule did not terminate normally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RuleResult {
    /// A normal outcome with the given items.
    pub fn ok(id: impl Into<String>, title: impl Into<String>, items: Vec<RuleItem>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            items,
            error: None,
        }
    }

    /// An abnormal outcome (expression raised or timed out).
    pub fn failed(
        id: impl Into<String>,
        title: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            items: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// True if this result is a load-diagnostic carrier, not a real rule
    /// outcome.
    pub fn is_diagnostic(&self) -> bool {
        self.id.starts_with(DIAGNOSTIC_PREFIX)
    }

    /// True if this is a real rule outcome with at least one issue.
    pub fn has_violations(&self) -> bool {
        !self.is_diagnostic() && !self.items.is_empty()
    }
}
