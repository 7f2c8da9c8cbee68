//! Path expressions and value navigation for Matterflow.
//!
//! This crate provides the two building blocks everything else navigates
//! with:
//!
//! - [`PathExpression`]: a parsed dotted path, optionally containing a single
//!   array-notation marker (`[]`), e.g. `commands[].name`. Malformed
//!   expressions are rejected at construction, never at evaluation time.
//! - Navigation functions ([`evaluate_path`], [`lookup`]) that walk a
//!   `serde_json::Value` tree safely: a type mismatch or missing key produces
//!   a typed [`PathError`], never a panic.
//!
//! # Example
//!
//! ```
//! use matterflow_path::{PathExpression, evaluate_path};
//! use serde_json::json;
//!
//! let expr = PathExpression::parse_simple("project.name").unwrap();
//! let data = json!({"project": {"name": "matterflow"}});
//! let value = evaluate_path(&data, &expr).unwrap();
//! assert_eq!(value, &json!("matterflow"));
//! ```

pub mod error;
pub mod expression;
pub mod navigate;

pub use error::{PathError, PathResult};
pub use expression::{PathExpression, PathSegment};
pub use navigate::{evaluate_path, lookup};
