//! Memory View Analysis Library.
//!
//! This crate computes the memory view of a hierarchical hardware design: the
//! set of memory regions every bus initiator can reach, each at the absolute
//! address the initiator sees it at. It also checks that sibling memory
//! regions tile their container consistently.
//!
//! # Architecture
//!
//! * **Graph**: a design is flattened into a connectivity graph of bus
//!   interfaces joined by interconnections, channels, bridges and
//!   hierarchical pass-throughs.
//! * **Search**: every initiator seeds a depth-first enumeration of simple
//!   paths to memory-exposing targets.
//! * **Resolution**: base and remap addresses along each path are folded into
//!   the absolute address of the reached memory tree.
//! * **Validation**: names, bounds, overlaps, alignment and presence of
//!   sibling regions are checked per container.
//!
//! # Modules
//!
//! * `analysis`: Path search, address resolution and region validation.
//! * `common`: Interface modes, errors and the expression evaluator.
//! * `config`: Configuration loading and parsing.
//! * `design`: The input library model and its loader.
//! * `graph`: The connectivity graph and the factory that builds it.
//! * `memory`: Evaluated memory trees.
//! * `report`: Memory listings and validation reports.
//! * `stats`: Analysis statistics collection.

/// Path search, address resolution and region validation.
///
/// Provides the read-only analyses run over a connectivity graph, plus the
/// [`analyze`](analysis::analyze) pipeline tying them together.
pub mod analysis;

/// Shared types, error handling and expression evaluation.
///
/// Defines interface modes and connection kinds, the diagnostic types
/// reported by every stage, and the evaluator contract used for all
/// symbolic addresses.
pub mod common;

/// Configuration system for analysis limits, output and logging.
///
/// Loads TOML configuration files; every setting has a default.
pub mod config;

/// Design library model and loader.
///
/// Components, designs, bus interfaces and memory descriptions as read from
/// TOML or JSON documents.
pub mod design;

/// Connectivity graph and its factory.
pub mod graph;

/// Evaluated memory trees.
pub mod memory;

/// Output formats.
pub mod report;

/// Analysis statistics collection and reporting.
pub mod stats;
