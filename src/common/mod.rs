//! Common types shared by every stage of the analysis.
//!
//! This module provides the interface and connection classifications, the
//! error and diagnostic taxonomy, and the expression evaluator contract that
//! the graph factory, resolver and validator all consume.

/// Interface modes and connection kinds.
pub mod data;

/// Error types and analysis diagnostics.
pub mod error;

/// Expression evaluator contract and the parameter-table evaluator.
pub mod expr;

pub use data::{ConnectionKind, InterfaceMode};
pub use error::{Diagnostic, EvaluationFailure, GraphError, ResolutionError, SearchLimit};
pub use expr::{ExpressionEvaluator, ParameterEvaluator, Value};
