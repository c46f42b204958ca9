//! Concurrent rule evaluation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

use archlint_model::DatasetView;
use archlint_rules::{RuleDescriptor, RuleEvaluator, RuleResult};

/// Wall-clock ceiling for one evaluation pass.
pub const DEFAULT_RULE_TIMEOUT: Duration = Duration::from_secs(10);

/// Evaluates every configured rule against one dataset view.
///
/// Rules run as independent tasks; a rule raising or hanging cannot
/// affect the others. Both outcomes flow through a single completion
/// channel, so collection does not distinguish the success and failure
/// paths structurally; it only inspects the `error` field afterwards.
pub struct ValidatorEngine {
    evaluator: Arc<dyn RuleEvaluator>,
    timeout: Duration,
}

impl ValidatorEngine {
    /// Creates an engine around the injected evaluator.
    pub fn new(evaluator: Arc<dyn RuleEvaluator>) -> Self {
        Self {
            evaluator,
            timeout: DEFAULT_RULE_TIMEOUT,
        }
    }

    /// Overrides the evaluation ceiling.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs all rules, returning one result per completed rule.
    ///
    /// Waits until every rule has reported completion or the ceiling
    /// elapses, whichever comes first. On ceiling expiry the outstanding
    /// rules are abandoned: availability over completeness, so one
    /// pathological expression cannot hang the run. Results are sorted
    /// by rule id for deterministic downstream consumption.
    pub async fn run_all(
        &self,
        rules: &[RuleDescriptor],
        dataset: Arc<DatasetView>,
    ) -> Vec<RuleResult> {
        if rules.is_empty() {
            debug!("No rules configured, skipping evaluation");
            return Vec::new();
        }

        let total = rules.len();
        let (tx, mut rx) = mpsc::channel::<RuleResult>(total);
        let mut handles = Vec::with_capacity(total);

        for rule in rules {
            let evaluation = self.evaluator.evaluate(&rule.expression, Arc::clone(&dataset));
            let id = rule.id.clone();
            let title = rule.title.clone();
            let completion = tx.clone();
            handles.push(tokio::spawn(async move {
                let result = match evaluation.await {
                    Ok(items) => RuleResult::ok(id, title, items),
                    Err(error) => {
                        warn!("Rule '{}' failed: {}", id, error);
                        RuleResult::failed(id, title, error.to_string())
                    }
                };
                // Receiver gone means the ceiling already expired.
                let _ = completion.send(result).await;
            }));
        }
        drop(tx);

        let deadline = Instant::now() + self.timeout;
        let mut results = Vec::with_capacity(total);
        while results.len() < total {
            match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(Some(result)) => results.push(result),
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        "Evaluation ceiling of {:?} reached with {} of {} rules outstanding, \
                         proceeding with partial results",
                        self.timeout,
                        total - results.len(),
                        total
                    );
                    break;
                }
            }
        }

        for handle in handles {
            handle.abort();
        }

        results.sort_by(|a, b| a.id.cmp(&b.id));
        results
    }
}
