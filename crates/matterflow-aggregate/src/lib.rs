//! Multi-document aggregation for Matterflow.
//!
//! This crate walks collections of [`Document`]s with array-notation path
//! expressions and combines the results:
//!
//! - [`evaluate`] / [`evaluate_unique`]: collect values matched by an
//!   expression like `commands[].name` across every document, accumulating
//!   per-document errors instead of aborting the batch.
//! - [`merge`]: combine arrays gathered from multiple documents using a
//!   configured [`MergeStrategy`].
//!
//! All functions here are pure; documents are borrowed for the duration of
//! one call and never mutated.

pub mod document;
pub mod error;
pub mod evaluator;
pub mod merge;

pub use document::Document;
pub use error::{EvalError, EvalErrorKind};
pub use evaluator::{Evaluation, evaluate, evaluate_unique};
pub use merge::{MergeConfig, MergeResult, MergeStrategy, MergedData, merge};
