//! The opaque rule-evaluator capability.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use archlint_model::DatasetView;

use crate::RuleItem;

/// Errors raised by expression evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The evaluator does not understand the expression.
    #[error("Unknown expression: {0}")]
    UnknownExpression(String),

    /// The expression is recognized but malformed.
    #[error("Invalid expression '{expression}': {message}")]
    InvalidExpression {
        /// The offending expression.
        expression: String,
        /// What is wrong with it.
        message: String,
    },

    /// The expression raised during evaluation.
    #[error("Evaluation failed: {0}")]
    Failed(String),
}

/// Future returned by [`RuleEvaluator::evaluate`].
pub type EvalFuture = Pin<Box<dyn Future<Output = Result<Vec<RuleItem>, EvalError>> + Send>>;

/// The expression-evaluator capability injected into the engine.
///
/// The engine never inspects the expression language; it only needs this
/// contract: given an expression and the read-only dataset, produce zero
/// or more issue items or fail. Each evaluation runs as an independent
/// task, so implementations must be shareable and must not rely on
/// cross-rule side effects.
pub trait RuleEvaluator: Send + Sync {
    /// Evaluates one expression against the dataset.
    fn evaluate(&self, expression: &str, dataset: Arc<DatasetView>) -> EvalFuture;
}
