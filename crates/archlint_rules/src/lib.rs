//! # archlint_rules
//!
//! Rule surface for the archlint validator:
//! - [`RuleDescriptor`]: a named, declarative check (built-in or declared
//!   inside the manifest under `rules.validators`)
//! - [`RuleResult`] / [`RuleItem`]: the outcome of evaluating one rule
//! - [`RuleEvaluator`]: the opaque expression-evaluator capability the
//!   hosting environment injects into the engine
//! - [`BuiltinEvaluator`]: the stock evaluator shipped with the CLI

mod builtin;
mod descriptor;
mod evaluator;
mod result;

pub use builtin::{BuiltinEvaluator, builtin_descriptors};
pub use descriptor::{RuleDescriptor, custom_rules};
pub use evaluator::{EvalError, EvalFuture, RuleEvaluator};
pub use result::{DIAGNOSTIC_PREFIX, RuleItem, RuleResult};
