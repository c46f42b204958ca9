//! Report aggregation.

use serde::{Deserialize, Serialize};

use archlint_model::ManifestInfo;
use archlint_rules::RuleResult;

use crate::collector::{DiagnosticEntry, DiagnosticKind, DiagnosticsCollector};

/// One reported problem: either a load-time diagnostic or a rule result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Problem {
    /// Load-time diagnostic.
    Diagnostic(DiagnosticEntry),
    /// Outcome of one rule evaluation.
    Rule(RuleResult),
}

/// Summary statistics for one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    /// Total number of problems (diagnostics plus rule results).
    pub total_issues: usize,

    /// Number of load-time diagnostics.
    pub loading_errors: usize,

    /// Number of real rule results carrying at least one item.
    pub validation_errors: usize,
}

/// The sole data contract the core exposes to its callers.
///
/// `success` reflects rule outcomes only: a run succeeds when no real
/// (non-diagnostic-tagged) rule result carries items. Load diagnostics
/// are reported but do not flip `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Overall pass/fail.
    pub success: bool,

    /// Identifying information about the validated manifest.
    pub manifest_info: ManifestInfo,

    /// All problems: diagnostics followed by rule results.
    pub problems: Vec<Problem>,

    /// Summary statistics.
    pub stats: ValidationStats,
}

impl ValidationReport {
    /// Degenerate report for a catastrophically failed run.
    ///
    /// The core's public contract never throws: when the workspace or
    /// root document is fundamentally unusable, callers get this shape
    /// instead of an error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        let message = message.into();
        let entry = DiagnosticEntry {
            id: DiagnosticsCollector::derive_id(DiagnosticKind::Critical, &message),
            message,
            kind: DiagnosticKind::Critical,
        };
        Self {
            success: false,
            manifest_info: ManifestInfo::unavailable(),
            problems: vec![Problem::Diagnostic(entry)],
            stats: ValidationStats {
                total_issues: 1,
                loading_errors: 1,
                validation_errors: 0,
            },
        }
    }

    /// Serializes the report to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Merges load diagnostics and rule results into one report.
///
/// Rule results that found nothing and did not fail are dropped: a
/// clean run reports zero problems. Never fails; this is pure
/// bookkeeping over data the pipeline already produced.
pub fn aggregate(
    manifest_info: ManifestInfo,
    diagnostics: Vec<DiagnosticEntry>,
    rule_results: Vec<RuleResult>,
) -> ValidationReport {
    let loading_errors = diagnostics.len();
    let validation_errors = rule_results.iter().filter(|r| r.has_violations()).count();
    let success = validation_errors == 0;

    let problems: Vec<Problem> = diagnostics
        .into_iter()
        .map(Problem::Diagnostic)
        .chain(
            rule_results
                .into_iter()
                .filter(|r| !r.items.is_empty() || r.error.is_some())
                .map(Problem::Rule),
        )
        .collect();

    ValidationReport {
        success,
        manifest_info,
        stats: ValidationStats {
            total_issues: problems.len(),
            loading_errors,
            validation_errors,
        },
        problems,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archlint_rules::{DIAGNOSTIC_PREFIX, RuleItem};
    use pretty_assertions::assert_eq;

    fn info() -> ManifestInfo {
        ManifestInfo::unavailable()
    }

    #[test]
    fn test_success_with_no_problems() {
        let report = aggregate(info(), vec![], vec![]);
        assert!(report.success);
        assert_eq!(
            report.stats,
            ValidationStats {
                total_issues: 0,
                loading_errors: 0,
                validation_errors: 0
            }
        );
    }

    #[test]
    fn test_success_computation() {
        let results = vec![
            RuleResult::ok("empty", "Empty", vec![]),
            RuleResult::ok(
                "naming",
                "Naming",
                vec![RuleItem::new("i1", "bad id", "elements.BadComponent")],
            ),
        ];
        let report = aggregate(info(), vec![], results);

        assert!(!report.success);
        assert_eq!(report.stats.validation_errors, 1);
        // The empty result is not a problem.
        assert_eq!(report.stats.total_issues, 1);
    }

    #[test]
    fn test_clean_results_yield_empty_problems() {
        let results = vec![
            RuleResult::ok("a", "A", vec![]),
            RuleResult::ok("b", "B", vec![]),
        ];
        let report = aggregate(info(), vec![], results);

        assert!(report.success);
        assert!(report.problems.is_empty());
        assert_eq!(
            report.stats,
            ValidationStats {
                total_issues: 0,
                loading_errors: 0,
                validation_errors: 0
            }
        );
    }

    #[test]
    fn test_failed_result_is_kept_as_problem() {
        let results = vec![RuleResult::failed("broken", "Broken", "expression raised")];
        let report = aggregate(info(), vec![], results);

        // Abnormal termination is reported but is not a violation.
        assert!(report.success);
        assert_eq!(report.problems.len(), 1);
        assert_eq!(report.stats.validation_errors, 0);
    }

    #[test]
    fn test_diagnostic_tagged_results_excluded() {
        let results = vec![RuleResult::ok(
            format!("{}deadbeef", DIAGNOSTIC_PREFIX),
            "Loading problem carrier",
            vec![RuleItem::new("d1", "fetch failed", "file://x.json")],
        )];
        let report = aggregate(info(), vec![], results);

        // Items on a diagnostic-tagged result flip nothing.
        assert!(report.success);
        assert_eq!(report.stats.validation_errors, 0);
    }

    #[test]
    fn test_loading_diagnostics_do_not_flip_success() {
        let diagnostics = vec![DiagnosticEntry {
            id: format!("{}abc", DIAGNOSTIC_PREFIX),
            message: "fetch failed".to_string(),
            kind: DiagnosticKind::FetchFailed,
        }];
        let report = aggregate(info(), diagnostics, vec![]);

        assert!(report.success);
        assert_eq!(report.stats.loading_errors, 1);
        assert_eq!(report.stats.total_issues, 1);
    }

    #[test]
    fn test_degenerate_report_shape() {
        let report = ValidationReport::degenerate("workspace unreadable");
        assert!(!report.success);
        assert_eq!(report.problems.len(), 1);
        assert_eq!(
            report.stats,
            ValidationStats {
                total_issues: 1,
                loading_errors: 1,
                validation_errors: 0
            }
        );
        match &report.problems[0] {
            Problem::Diagnostic(entry) => {
                assert_eq!(entry.kind, DiagnosticKind::Critical);
                assert!(entry.id.starts_with(DIAGNOSTIC_PREFIX));
            }
            other => panic!("expected a diagnostic problem, got {:?}", other),
        }
    }

    #[test]
    fn test_report_serialization_is_camel_case() {
        let report = aggregate(info(), vec![], vec![]);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"manifestInfo\""));
        assert!(json.contains("\"totalIssues\""));
        assert!(json.contains("\"loadingErrors\""));
    }
}
