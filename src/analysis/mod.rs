//! Read-only analyses over a connectivity graph.
//!
//! [`analyze`] runs the whole memory view pipeline for one top component:
//! graph construction, path search and address resolution. Region
//! validation works on design descriptions directly and runs independently.

/// Initiator-to-target path enumeration.
pub mod path_search;

/// The region abstraction checked by the validator.
pub mod region;

/// Absolute address resolution along paths.
pub mod resolver;

/// Sibling region consistency checks.
pub mod validator;

use crate::common::{Diagnostic, ExpressionEvaluator, InterfaceMode};
use crate::config::AnalysisConfig;
use crate::design::Library;
use crate::graph::{ConnectivityGraph, ConnectivityGraphFactory};
use crate::stats::AnalysisStats;

pub use path_search::{MasterSlavePathSearch, PathResult, SearchLimits, SearchOutcome};
pub use region::{overlaps, AddressRegion, Region, Span};
pub use resolver::{AddressResolver, ResolutionOutcome, ResolvedRegion};
pub use validator::{MemoryRegionValidator, ValidationDiagnostic, ValidationReport};

/// Everything one memory view analysis produced.
#[derive(Debug)]
pub struct Analysis {
    pub graph: ConnectivityGraph,
    pub paths: Vec<PathResult>,
    /// Memory reached through paths, in path order, followed by the
    /// initiators' own address spaces.
    pub regions: Vec<ResolvedRegion>,
    /// Factory, search and resolution findings, in that order.
    pub diagnostics: Vec<Diagnostic>,
    pub stats: AnalysisStats,
}

/// Builds the graph of `top` and resolves every memory it can reach.
///
/// # Arguments
///
/// * `library` - Components and designs
/// * `top` - Name of the top component
/// * `evaluator` - Evaluator for every expression
/// * `config` - AUB default and search limits
pub fn analyze<E>(library: &Library, top: &str, evaluator: &E, config: &AnalysisConfig) -> Analysis
where
    E: ExpressionEvaluator + ?Sized,
{
    let mut stats = AnalysisStats::default();

    let built = ConnectivityGraphFactory::new(library, evaluator)
        .with_default_aub(config.default_aub)
        .build(top);
    let graph = built.graph;
    let mut diagnostics = built.diagnostics;

    stats.interfaces = graph.interface_count() as u64;
    stats.connections = graph.connection_count() as u64;
    stats.seeds = (graph.interfaces_of_mode(InterfaceMode::Initiator).count()
        + graph.interfaces_of_mode(InterfaceMode::MirroredInitiator).count()) as u64;

    let search = MasterSlavePathSearch::new(&graph).with_limits(config.limits());
    let outcome = search.find_paths();
    stats.paths_found = outcome.paths.len() as u64;
    stats.paths_redundant = outcome.redundant as u64;
    stats.paths_discarded = outcome.discarded as u64;
    diagnostics.extend(outcome.diagnostics);

    let resolver = AddressResolver::new(&graph, evaluator);
    let mut resolved = resolver.resolve_all(&outcome.paths);
    let spaces = resolver.resolve_address_spaces();
    resolved.regions.extend(spaces.regions);
    resolved.diagnostics.extend(spaces.diagnostics);

    stats.regions_resolved = resolved
        .regions
        .iter()
        .map(|r| r.region_count() as u64)
        .sum();
    diagnostics.extend(resolved.diagnostics);
    stats.diagnostics = diagnostics.len() as u64;

    Analysis {
        paths: outcome.paths,
        regions: resolved.regions,
        diagnostics,
        stats,
        graph,
    }
}
