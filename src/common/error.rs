//! Error and diagnostic types.
//!
//! Nothing in the analysis aborts a run. Fallible steps return one of the
//! error types below; callers fold them into a [`Diagnostic`] list and keep
//! going with whatever partial result remains.

use thiserror::Error;

/// Failure reported by an expression evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationFailure {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{found}' at offset {offset} in `{expression}`")]
    UnexpectedChar {
        expression: String,
        found: char,
        offset: usize,
    },

    #[error("unexpected end of expression `{0}`")]
    UnexpectedEnd(String),

    #[error("invalid literal `{0}`")]
    InvalidLiteral(String),

    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    #[error("parameter `{0}` is defined in terms of itself")]
    RecursiveParameter(String),

    #[error("division by zero in `{0}`")]
    DivisionByZero(String),

    #[error("arithmetic overflow in `{0}`")]
    Overflow(String),
}

/// Failure while inserting into a connectivity graph.
///
/// Fatal to the single insertion, never to the factory run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("interface {0} is already present in the graph")]
    DuplicateIdentifier(String),

    #[error("connection {connection} references unknown interface {interface}")]
    UnknownInterface {
        connection: String,
        interface: String,
    },
}

/// Failure while resolving the absolute address of one path.
///
/// The affected path is dropped; the remaining paths still resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("unresolved expression `{expression}` for {context}: {source}")]
    UnresolvedExpression {
        context: String,
        expression: String,
        #[source]
        source: EvaluationFailure,
    },

    #[error("address overflow while resolving {context}")]
    AddressOverflow { context: String },

    #[error("negative value {value} for {context}")]
    NegativeValue { context: String, value: i128 },

    #[error("path ends at {0}, which exposes no memory")]
    NoTerminalMemory(String),
}

/// Which bound stopped a path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLimit {
    Paths,
    Depth,
}

impl std::fmt::Display for SearchLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchLimit::Paths => f.write_str("paths"),
            SearchLimit::Depth => f.write_str("interfaces per path"),
        }
    }
}

/// One finding of a graph build, path search or resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("instance {instance} references unknown component {component}")]
    UnresolvedComponent { instance: String, component: String },

    #[error("component {component} references unknown design {design}")]
    UnresolvedDesign { component: String, design: String },

    #[error("design {design} is instantiated inside itself at {instance}")]
    CyclicHierarchy { design: String, instance: String },

    #[error("bus interface {interface} references unknown memory {memory}")]
    UnresolvedMemory { interface: String, memory: String },

    #[error("{context}: {source}")]
    Expression {
        context: String,
        #[source]
        source: EvaluationFailure,
    },

    #[error("path search from {seed} stopped after reaching the limit of {limit} {kind}")]
    PathLimitExceeded {
        seed: String,
        kind: SearchLimit,
        limit: usize,
    },

    #[error("register array {register} declares {dimension} elements, only the first {kept} fit its block")]
    ArrayTruncated {
        register: String,
        dimension: u64,
        kept: u64,
    },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}
