//! The validation-run orchestrator.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use archlint_model::{DatasetView, Locator, ManifestInfo};
use archlint_rules::{RuleDescriptor, RuleEvaluator, custom_rules};

use crate::engine::{DEFAULT_RULE_TIMEOUT, ValidatorEngine};
use crate::postprocess::build_entity_index;
use crate::report::{ValidationReport, aggregate};
use crate::resolver::ImportResolver;
use crate::{CoreError, FragmentFetcher, Session};

/// Runs complete validation sessions.
///
/// All collaborators arrive through the constructor (fetcher, evaluator,
/// built-in rule set, timeout, role), so there is no ambient state and
/// no initialization-order requirement; two validators in one process
/// do not interfere.
pub struct Validator {
    fetcher: Arc<dyn FragmentFetcher>,
    evaluator: Arc<dyn RuleEvaluator>,
    builtins: Vec<RuleDescriptor>,
    timeout: Duration,
    role: Option<String>,
}

impl Validator {
    /// Creates a validator with no built-in rules and default timeout.
    pub fn new(fetcher: Arc<dyn FragmentFetcher>, evaluator: Arc<dyn RuleEvaluator>) -> Self {
        Self {
            fetcher,
            evaluator,
            builtins: Vec::new(),
            timeout: DEFAULT_RULE_TIMEOUT,
            role: None,
        }
    }

    /// Sets the built-in rule descriptors supplied by the host.
    pub fn with_builtins(mut self, builtins: Vec<RuleDescriptor>) -> Self {
        self.builtins = builtins;
        self
    }

    /// Overrides the evaluation ceiling.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the active role for dataset scoping.
    pub fn with_role(mut self, role: Option<String>) -> Self {
        self.role = role;
        self
    }

    /// Runs one full validation session against `root`.
    ///
    /// Never fails: catastrophic problems (unreadable root, unusable
    /// manifest structure, an unexpected internal error) come back as
    /// the degenerate report instead of an `Err`.
    pub async fn validate(&self, root: &Locator) -> ValidationReport {
        match self.run_session(root).await {
            Ok(report) => report,
            Err(e) => {
                error!("Validation run failed: {}", e);
                ValidationReport::degenerate(e.to_string())
            }
        }
    }

    async fn run_session(&self, root: &Locator) -> Result<ValidationReport, CoreError> {
        // Fresh session: nothing bleeds in from a previous run.
        let mut session = Session::new();

        let resolver = ImportResolver::new(Arc::clone(&self.fetcher));
        let merged = resolver.resolve(&mut session, root).await?;
        info!(
            "Resolved {} fragment(s), {} load diagnostic(s)",
            session.store().len(),
            session.diagnostic_count()
        );

        let index = build_entity_index(&merged)?;
        let manifest_info = ManifestInfo::from_manifest(&merged);

        let rules = self.collect_rules(&merged);
        debug!("Evaluating {} rule(s)", rules.len());

        let dataset = Arc::new(DatasetView::build(merged, index, self.role.clone()));
        let engine =
            ValidatorEngine::new(Arc::clone(&self.evaluator)).with_timeout(self.timeout);
        let results = engine.run_all(&rules, dataset).await;

        let diagnostics = session.finish();
        Ok(aggregate(manifest_info, diagnostics, results))
    }

    /// Built-ins plus manifest-declared custom rules, first id wins.
    fn collect_rules(&self, merged: &serde_json::Value) -> Vec<RuleDescriptor> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut rules = Vec::new();
        for rule in self.builtins.iter().cloned().chain(custom_rules(merged)) {
            if seen.insert(rule.id.clone()) {
                rules.push(rule);
            } else {
                debug!("Ignoring duplicate rule id '{}'", rule.id);
            }
        }
        rules
    }
}
