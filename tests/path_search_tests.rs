//! Integration tests for initiator-to-target path search.

use memview::analysis::{MasterSlavePathSearch, PathResult, SearchLimits};
use memview::common::{ConnectionKind, Diagnostic, InterfaceMode, SearchLimit};
use memview::graph::{ConnectivityGraph, ConnectivityInterface, InterfaceId};
use memview::memory::{MemoryItem, MemoryItemKind};
use proptest::prelude::*;
use std::collections::HashSet;

/// Adds an interface, attaching a memory map when `with_map` is set.
fn add(graph: &mut ConnectivityGraph, path: &str, bus: &str, mode: InterfaceMode, with_map: bool) -> InterfaceId {
    let mut interface = ConnectivityInterface::new(path, bus, mode);
    if with_map {
        let identifier = format!("{}.map", path);
        let memory = graph.add_memory(MemoryItem::new("map", identifier, MemoryItemKind::MemoryMap, 8));
        interface = interface.with_memory(memory);
    }
    graph.add_interface(interface).unwrap()
}

fn connect(graph: &mut ConnectivityGraph, kind: ConnectionKind, a: &str, b: &str) {
    graph
        .add_connection(format!("{}-{}", a, b), kind, a, b)
        .unwrap();
}

fn names(graph: &ConnectivityGraph, path: &PathResult) -> Vec<String> {
    path.interfaces()
        .iter()
        .map(|id| graph.interface(*id).unwrap().name().to_string())
        .collect()
}

/// Tests the direct initiator-to-target case.
#[test]
fn test_direct_path() {
    let mut graph = ConnectivityGraph::new();
    let cpu = add(&mut graph, "cpu", "m", InterfaceMode::Initiator, false);
    let mem = add(&mut graph, "mem", "s", InterfaceMode::Target, true);
    connect(&mut graph, ConnectionKind::Interconnection, "cpu.m", "mem.s");

    let outcome = MasterSlavePathSearch::new(&graph).find_paths();

    assert_eq!(outcome.paths.len(), 1);
    assert_eq!(outcome.paths[0].initiator(), cpu);
    assert_eq!(outcome.paths[0].terminal(), mem);
    assert!(outcome.diagnostics.is_empty());
}

/// Tests that a cycle without terminals yields no paths and terminates.
#[test]
fn test_cycle_without_terminal() {
    let mut graph = ConnectivityGraph::new();
    add(&mut graph, "a", "m", InterfaceMode::Initiator, false);
    add(&mut graph, "b", "mm", InterfaceMode::MirroredInitiator, false);
    add(&mut graph, "c", "ms", InterfaceMode::MirroredTarget, false);
    connect(&mut graph, ConnectionKind::Interconnection, "a.m", "b.mm");
    connect(&mut graph, ConnectionKind::Channel, "b.mm", "c.ms");
    connect(&mut graph, ConnectionKind::Bridge, "c.ms", "a.m");

    let outcome = MasterSlavePathSearch::new(&graph).find_paths();

    assert!(outcome.paths.is_empty());
    assert!(outcome.discarded > 0);
    assert!(outcome.diagnostics.is_empty());
}

/// Tests that a cycle in front of a terminal still reaches the terminal once
/// per simple path.
#[test]
fn test_cycle_before_terminal() {
    let mut graph = ConnectivityGraph::new();
    add(&mut graph, "cpu", "m", InterfaceMode::Initiator, false);
    add(&mut graph, "x", "mm", InterfaceMode::MirroredInitiator, false);
    add(&mut graph, "x", "ms", InterfaceMode::MirroredTarget, false);
    add(&mut graph, "y", "mm", InterfaceMode::MirroredInitiator, false);
    add(&mut graph, "mem", "s", InterfaceMode::Target, true);
    connect(&mut graph, ConnectionKind::Interconnection, "cpu.m", "x.mm");
    connect(&mut graph, ConnectionKind::Channel, "x.mm", "x.ms");
    connect(&mut graph, ConnectionKind::Interconnection, "x.ms", "y.mm");
    connect(&mut graph, ConnectionKind::Interconnection, "y.mm", "x.mm");
    connect(&mut graph, ConnectionKind::Interconnection, "x.ms", "mem.s");

    let outcome = MasterSlavePathSearch::new(&graph).find_paths();

    let found: Vec<Vec<String>> = outcome.paths.iter().map(|p| names(&graph, p)).collect();
    assert!(found.contains(&vec![
        "cpu.m".to_string(),
        "x.mm".to_string(),
        "x.ms".to_string(),
        "mem.s".to_string(),
    ]));
    for path in &outcome.paths {
        let distinct: HashSet<_> = path.interfaces().iter().collect();
        assert_eq!(distinct.len(), path.len());
    }
}

/// Tests that an initiator is not entered through a plain interconnection.
#[test]
fn test_initiator_not_entered_through_interconnection() {
    let mut graph = ConnectivityGraph::new();
    add(&mut graph, "cpu", "m", InterfaceMode::Initiator, false);
    add(&mut graph, "dma", "m", InterfaceMode::Initiator, false);
    add(&mut graph, "mem", "s", InterfaceMode::Target, true);
    connect(&mut graph, ConnectionKind::Interconnection, "cpu.m", "dma.m");
    connect(&mut graph, ConnectionKind::Interconnection, "dma.m", "mem.s");

    let outcome = MasterSlavePathSearch::new(&graph).find_paths();

    let found: Vec<Vec<String>> = outcome.paths.iter().map(|p| names(&graph, p)).collect();
    assert_eq!(found, vec![vec!["dma.m".to_string(), "mem.s".to_string()]]);
}

/// Tests that a walk crosses a bridge and drops the bridge-side tail path.
#[test]
fn test_bridge_path() {
    let mut graph = ConnectivityGraph::new();
    add(&mut graph, "master", "m", InterfaceMode::Initiator, false);
    add(&mut graph, "bridge", "s", InterfaceMode::Target, false);
    add(&mut graph, "bridge", "m", InterfaceMode::Initiator, false);
    add(&mut graph, "slave", "s", InterfaceMode::Target, true);
    connect(&mut graph, ConnectionKind::Interconnection, "master.m", "bridge.s");
    connect(&mut graph, ConnectionKind::Bridge, "bridge.s", "bridge.m");
    connect(&mut graph, ConnectionKind::Interconnection, "bridge.m", "slave.s");

    let outcome = MasterSlavePathSearch::new(&graph).find_paths();

    let found: Vec<Vec<String>> = outcome.paths.iter().map(|p| names(&graph, p)).collect();
    assert_eq!(
        found,
        vec![vec![
            "master.m".to_string(),
            "bridge.s".to_string(),
            "bridge.m".to_string(),
            "slave.s".to_string(),
        ]]
    );
    assert_eq!(outcome.redundant, 1);
}

/// Tests that the bridge-side tail is still found when searched on its own.
#[test]
fn test_paths_from_single_seed() {
    let mut graph = ConnectivityGraph::new();
    add(&mut graph, "master", "m", InterfaceMode::Initiator, false);
    add(&mut graph, "bridge", "s", InterfaceMode::Target, false);
    let bridge_m = add(&mut graph, "bridge", "m", InterfaceMode::Initiator, false);
    add(&mut graph, "slave", "s", InterfaceMode::Target, true);
    connect(&mut graph, ConnectionKind::Interconnection, "master.m", "bridge.s");
    connect(&mut graph, ConnectionKind::Bridge, "bridge.s", "bridge.m");
    connect(&mut graph, ConnectionKind::Interconnection, "bridge.m", "slave.s");

    let outcome = MasterSlavePathSearch::new(&graph).paths_from(bridge_m);

    assert_eq!(outcome.paths.len(), 1);
    assert_eq!(names(&graph, &outcome.paths[0]), vec!["bridge.m", "slave.s"]);
}

/// Tests that one initiator reaches every connected target.
#[test]
fn test_multiple_targets() {
    let mut graph = ConnectivityGraph::new();
    add(&mut graph, "cpu", "m", InterfaceMode::Initiator, false);
    add(&mut graph, "mem0", "s", InterfaceMode::Target, true);
    add(&mut graph, "mem1", "s", InterfaceMode::Target, true);
    connect(&mut graph, ConnectionKind::Interconnection, "cpu.m", "mem0.s");
    connect(&mut graph, ConnectionKind::Interconnection, "cpu.m", "mem1.s");

    let outcome = MasterSlavePathSearch::new(&graph).find_paths();

    let terminals: Vec<String> = outcome
        .paths
        .iter()
        .map(|p| graph.interface(p.terminal()).unwrap().name().to_string())
        .collect();
    assert_eq!(terminals, vec!["mem0.s", "mem1.s"]);
}

/// Tests that a target without memory is crossed, not reached.
#[test]
fn test_target_without_memory_is_not_terminal() {
    let mut graph = ConnectivityGraph::new();
    add(&mut graph, "cpu", "m", InterfaceMode::Initiator, false);
    let empty = add(&mut graph, "stub", "s", InterfaceMode::Target, false);
    connect(&mut graph, ConnectionKind::Interconnection, "cpu.m", "stub.s");

    let search = MasterSlavePathSearch::new(&graph);
    assert!(!search.is_terminal(empty));

    let outcome = search.find_paths();
    assert!(outcome.paths.is_empty());
    assert_eq!(outcome.discarded, 1);
}

/// Tests that the path count bound stops the search with a diagnostic.
#[test]
fn test_path_limit() {
    let mut graph = ConnectivityGraph::new();
    add(&mut graph, "cpu", "m", InterfaceMode::Initiator, false);
    for i in 0..5 {
        let path = format!("mem{}", i);
        add(&mut graph, &path, "s", InterfaceMode::Target, true);
        connect(&mut graph, ConnectionKind::Interconnection, "cpu.m", &format!("{}.s", path));
    }

    let limits = SearchLimits {
        max_paths: 3,
        ..SearchLimits::default()
    };
    let outcome = MasterSlavePathSearch::new(&graph).with_limits(limits).find_paths();

    assert_eq!(outcome.paths.len(), 3);
    assert_eq!(
        outcome.diagnostics,
        vec![Diagnostic::PathLimitExceeded {
            seed: "cpu.m".to_string(),
            kind: SearchLimit::Paths,
            limit: 3,
        }]
    );
}

/// Tests that the depth bound cuts long chains with one diagnostic.
#[test]
fn test_depth_limit() {
    let mut graph = ConnectivityGraph::new();
    add(&mut graph, "cpu", "m", InterfaceMode::Initiator, false);
    let mut previous = "cpu.m".to_string();
    for i in 0..6 {
        let path = format!("hop{}", i);
        add(&mut graph, &path, "ms", InterfaceMode::MirroredTarget, false);
        let name = format!("{}.ms", path);
        connect(&mut graph, ConnectionKind::Interconnection, &previous, &name);
        previous = name;
    }
    add(&mut graph, "mem", "s", InterfaceMode::Target, true);
    connect(&mut graph, ConnectionKind::Interconnection, &previous, "mem.s");

    let limits = SearchLimits {
        max_depth: 4,
        ..SearchLimits::default()
    };
    let outcome = MasterSlavePathSearch::new(&graph).with_limits(limits).find_paths();

    assert!(outcome.paths.is_empty());
    assert_eq!(
        outcome.diagnostics,
        vec![Diagnostic::PathLimitExceeded {
            seed: "cpu.m".to_string(),
            kind: SearchLimit::Depth,
            limit: 4,
        }]
    );

    let unbounded = MasterSlavePathSearch::new(&graph).find_paths();
    assert_eq!(unbounded.paths.len(), 1);
    assert_eq!(unbounded.paths[0].len(), 8);
}

/// Tests that an empty chain is not a path.
#[test]
fn test_empty_path_rejected() {
    assert!(PathResult::new(Vec::new()).is_none());
}

const MODES: [InterfaceMode; 5] = [
    InterfaceMode::Initiator,
    InterfaceMode::Target,
    InterfaceMode::MirroredInitiator,
    InterfaceMode::MirroredTarget,
    InterfaceMode::System,
];

const KINDS: [ConnectionKind; 4] = [
    ConnectionKind::Interconnection,
    ConnectionKind::Channel,
    ConnectionKind::Bridge,
    ConnectionKind::Hierarchical,
];

/// Builds a graph from generated nodes and edges.
fn random_graph(nodes: &[(usize, bool)], edges: &[(usize, usize, usize)]) -> ConnectivityGraph {
    let mut graph = ConnectivityGraph::new();
    for (i, (mode, with_map)) in nodes.iter().enumerate() {
        add(&mut graph, &format!("n{}", i), "bus", MODES[*mode], *with_map);
    }
    for (a, b, kind) in edges {
        let a = format!("n{}.bus", a % nodes.len());
        let b = format!("n{}.bus", b % nodes.len());
        connect(&mut graph, KINDS[*kind], &a, &b);
    }
    graph
}

proptest! {
    /// Tests that every path is simple, seeded by an initiator and ends at a
    /// terminal, and that repeated searches agree.
    #[test]
    fn test_random_graph_paths(
        nodes in prop::collection::vec((0usize..5, any::<bool>()), 1..8),
        edges in prop::collection::vec((0usize..8, 0usize..8, 0usize..4), 0..16),
    ) {
        let graph = random_graph(&nodes, &edges);
        let search = MasterSlavePathSearch::new(&graph);
        let first = search.find_paths();
        let second = search.find_paths();

        prop_assert_eq!(&first.paths, &second.paths);
        for path in &first.paths {
            let distinct: HashSet<_> = path.interfaces().iter().collect();
            prop_assert_eq!(distinct.len(), path.len());
            prop_assert!(graph.interface(path.initiator()).unwrap().mode().is_initiator());
            prop_assert!(search.is_terminal(path.terminal()));
        }
    }
}
