//! Initiator-to-target path enumeration.
//!
//! Every initiator and mirrored-initiator interface seeds a depth-first walk
//! over the connectivity graph. A walk never revisits an interface already on
//! its path, so cyclic wiring through bridges terminates. A path ends at the
//! first target or mirrored-target interface that exposes a memory map or
//! address space.
//!
//! Edges are undirected; direction comes from interface modes. An initiator
//! interface only originates transactions, so a walk may enter one only
//! through a bridge (leaving a bridge component on its initiator side) or a
//! hierarchical pass-through (following an initiator out of a sub-design).

use crate::common::{Diagnostic, InterfaceMode, SearchLimit};
use crate::graph::{ConnectionId, ConnectivityGraph, InterfaceId};
use std::collections::HashMap;
use std::ops::ControlFlow;

/// Ordered chain of pairwise distinct interfaces from an initiator to a
/// terminal target.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathResult(Vec<InterfaceId>);

impl PathResult {
    /// Wraps an interface chain.
    ///
    /// Returns `None` for an empty chain.
    pub fn new(interfaces: Vec<InterfaceId>) -> Option<Self> {
        if interfaces.is_empty() {
            None
        } else {
            Some(Self(interfaces))
        }
    }

    pub fn interfaces(&self) -> &[InterfaceId] {
        &self.0
    }

    /// The seed of the path.
    pub fn initiator(&self) -> InterfaceId {
        self.0[0]
    }

    /// The interface exposing the reached memory.
    pub fn terminal(&self) -> InterfaceId {
        self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if `other` is a strictly shorter tail of this path.
    pub fn has_suffix(&self, other: &PathResult) -> bool {
        other.len() < self.len() && self.0.ends_with(&other.0)
    }
}

/// Bounds on a single search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of paths collected over all seeds.
    pub max_paths: usize,
    /// Maximum number of interfaces on one path.
    pub max_depth: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_paths: 100_000,
            max_depth: 256,
        }
    }
}

/// Result of a search.
#[derive(Debug, Default, Clone)]
pub struct SearchOutcome {
    pub paths: Vec<PathResult>,
    /// Walks that ended at an interface with no eligible neighbour.
    pub discarded: usize,
    /// Paths dropped because another path already covers them.
    pub redundant: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Per-seed walk state.
struct Walk<'o> {
    seed: InterfaceId,
    path: Vec<InterfaceId>,
    on_path: Vec<bool>,
    depth_reported: bool,
    outcome: &'o mut SearchOutcome,
}

/// Enumerates simple paths from initiators to memory-exposing targets.
pub struct MasterSlavePathSearch<'g> {
    graph: &'g ConnectivityGraph,
    limits: SearchLimits,
}

impl<'g> MasterSlavePathSearch<'g> {
    /// Creates a search with default limits.
    pub fn new(graph: &'g ConnectivityGraph) -> Self {
        Self {
            graph,
            limits: SearchLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Iterates the seed interfaces in graph insertion order.
    pub fn seeds(&self) -> impl Iterator<Item = InterfaceId> + 'g {
        self.graph
            .interfaces()
            .filter(|(_, i)| i.mode().is_initiator())
            .map(|(id, _)| id)
    }

    /// Finds every path from every seed.
    ///
    /// Paths that are a tail of a longer path are dropped. Such a tail
    /// appears when a mirrored initiator inside an interconnect, or an
    /// initiator behind a bridge, seeds a walk over wiring that a walk from
    /// the real initiator already covered.
    pub fn find_paths(&self) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();
        for seed in self.seeds() {
            if self.walk(seed, &mut outcome).is_break() {
                break;
            }
        }

        let found = outcome.paths.len();
        outcome.paths = remove_suffix_paths(std::mem::take(&mut outcome.paths));
        outcome.redundant = found - outcome.paths.len();

        tracing::info!(
            "[Search] Found {} paths ({} redundant, {} dead ends)",
            outcome.paths.len(),
            outcome.redundant,
            outcome.discarded
        );
        outcome
    }

    /// Finds every path from one seed, without dropping tails.
    pub fn paths_from(&self, seed: InterfaceId) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();
        let _ = self.walk(seed, &mut outcome);
        outcome
    }

    fn walk(&self, seed: InterfaceId, outcome: &mut SearchOutcome) -> ControlFlow<()> {
        if self.graph.interface(seed).is_none() {
            return ControlFlow::Continue(());
        }

        let mut on_path = vec![false; self.graph.interface_count()];
        on_path[seed.index()] = true;
        let mut walk = Walk {
            seed,
            path: vec![seed],
            on_path,
            depth_reported: false,
            outcome,
        };
        self.extend(&mut walk)
    }

    fn extend(&self, walk: &mut Walk<'_>) -> ControlFlow<()> {
        let current = walk.path[walk.path.len() - 1];
        let mut tried: Vec<InterfaceId> = Vec::new();

        for &(next, connection) in self.graph.links(current) {
            if walk.on_path[next.index()] || tried.contains(&next) {
                continue;
            }
            if !self.may_enter(next, connection) {
                continue;
            }
            tried.push(next);

            if walk.path.len() >= self.limits.max_depth {
                if !walk.depth_reported {
                    walk.depth_reported = true;
                    self.report_limit(walk, SearchLimit::Depth, self.limits.max_depth);
                }
                continue;
            }

            if self.is_terminal(next) {
                if walk.outcome.paths.len() >= self.limits.max_paths {
                    self.report_limit(walk, SearchLimit::Paths, self.limits.max_paths);
                    return ControlFlow::Break(());
                }
                let mut found = walk.path.clone();
                found.push(next);
                walk.outcome.paths.push(PathResult(found));
                continue;
            }

            walk.path.push(next);
            walk.on_path[next.index()] = true;
            let flow = self.extend(walk);
            walk.on_path[next.index()] = false;
            walk.path.pop();
            if flow.is_break() {
                return flow;
            }
        }

        if tried.is_empty() {
            walk.outcome.discarded += 1;
        }
        ControlFlow::Continue(())
    }

    /// An initiator is entered only through a bridge or a hierarchical
    /// pass-through.
    fn may_enter(&self, next: InterfaceId, connection: ConnectionId) -> bool {
        let Some(interface) = self.graph.interface(next) else {
            return false;
        };
        if interface.mode() != InterfaceMode::Initiator {
            return true;
        }
        self.graph
            .connection(connection)
            .map_or(false, |c| c.kind().enters_initiator())
    }

    /// Returns `true` if a path may end at `id`.
    pub fn is_terminal(&self, id: InterfaceId) -> bool {
        let Some(interface) = self.graph.interface(id) else {
            return false;
        };
        interface.mode().is_target()
            && self
                .graph
                .memory_of(id)
                .map_or(false, |memory| memory.kind.is_root())
    }

    fn report_limit(&self, walk: &mut Walk<'_>, kind: SearchLimit, limit: usize) {
        let seed = self
            .graph
            .interface(walk.seed)
            .map(|i| i.name().to_string())
            .unwrap_or_default();
        let diagnostic = Diagnostic::PathLimitExceeded { seed, kind, limit };
        tracing::warn!("[Search] {}", diagnostic);
        walk.outcome.diagnostics.push(diagnostic);
    }
}

/// Drops every path that is a tail of another path, keeping order.
fn remove_suffix_paths(paths: Vec<PathResult>) -> Vec<PathResult> {
    let mut by_terminal: HashMap<InterfaceId, Vec<usize>> = HashMap::new();
    for (idx, path) in paths.iter().enumerate() {
        by_terminal.entry(path.terminal()).or_default().push(idx);
    }

    let covered: Vec<bool> = paths
        .iter()
        .map(|path| {
            by_terminal
                .get(&path.terminal())
                .map_or(false, |others| others.iter().any(|&other| paths[other].has_suffix(path)))
        })
        .collect();

    paths
        .into_iter()
        .zip(covered)
        .filter_map(|(path, covered)| (!covered).then_some(path))
        .collect()
}
