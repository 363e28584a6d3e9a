//! Integration tests for the connectivity graph.

use memview::common::{ConnectionKind, GraphError, InterfaceMode};
use memview::graph::{ConnectivityGraph, ConnectivityInterface};
use memview::memory::{MemoryItem, MemoryItemKind};

/// Creates a graph with an initiator, an interconnect and a target.
fn create_test_graph() -> ConnectivityGraph {
    let mut graph = ConnectivityGraph::new();
    graph
        .add_interface(ConnectivityInterface::new("cpu", "m", InterfaceMode::Initiator))
        .unwrap();
    graph
        .add_interface(ConnectivityInterface::new("bus", "mm", InterfaceMode::MirroredInitiator))
        .unwrap();
    graph
        .add_interface(ConnectivityInterface::new("bus", "ms", InterfaceMode::MirroredTarget))
        .unwrap();
    graph
        .add_interface(ConnectivityInterface::new("mem", "s", InterfaceMode::Target))
        .unwrap();
    graph
}

/// Tests that interfaces are named after their instance path and bus.
#[test]
fn test_interface_qualified_name() {
    let interface = ConnectivityInterface::new("top.sub", "ctrl", InterfaceMode::Target);
    assert_eq!(interface.name(), "top.sub.ctrl");
    assert_eq!(interface.bus(), "ctrl");
    assert_eq!(interface.instance_path(), "top.sub");

    let bare = ConnectivityInterface::new("", "ctrl", InterfaceMode::Target);
    assert_eq!(bare.name(), "ctrl");
}

/// Tests that a second interface with the same name is rejected.
#[test]
fn test_duplicate_interface_rejected() {
    let mut graph = create_test_graph();
    let result = graph.add_interface(ConnectivityInterface::new("cpu", "m", InterfaceMode::Target));

    assert_eq!(
        result,
        Err(GraphError::DuplicateIdentifier("cpu.m".to_string()))
    );
    assert_eq!(graph.interface_count(), 4);
}

/// Tests that connections to unknown interfaces are rejected.
#[test]
fn test_unknown_interface_rejected() {
    let mut graph = create_test_graph();
    let result = graph.add_connection("wire", ConnectionKind::Interconnection, "cpu.m", "dma.s");

    assert_eq!(
        result,
        Err(GraphError::UnknownInterface {
            connection: "wire".to_string(),
            interface: "dma.s".to_string(),
        })
    );
    assert_eq!(graph.connection_count(), 0);
    let cpu = graph.find("cpu.m").unwrap();
    assert_eq!(graph.neighbors(cpu).count(), 0);
}

/// Tests that every connection is visible from both endpoints.
#[test]
fn test_connection_symmetry() {
    let mut graph = create_test_graph();
    graph
        .add_connection("w0", ConnectionKind::Interconnection, "cpu.m", "bus.mm")
        .unwrap();
    graph
        .add_connection("bus.ch", ConnectionKind::Channel, "bus.mm", "bus.ms")
        .unwrap();
    graph
        .add_connection("w1", ConnectionKind::Interconnection, "bus.ms", "mem.s")
        .unwrap();

    for connection in graph.connections() {
        let (a, b) = connection.endpoints();
        assert!(graph.neighbors(a).any(|n| n == b));
        assert!(graph.neighbors(b).any(|n| n == a));
        assert_eq!(connection.other(a), Some(b));
        assert_eq!(connection.other(b), Some(a));
    }

    let mm = graph.find("bus.mm").unwrap();
    let names: Vec<&str> = graph
        .neighbors(mm)
        .map(|id| graph.interface(id).unwrap().name())
        .collect();
    assert_eq!(names, vec!["cpu.m", "bus.ms"]);
}

/// Tests that an interface joined twice is one neighbour.
#[test]
fn test_neighbors_are_distinct() {
    let mut graph = create_test_graph();
    graph
        .add_connection("w0", ConnectionKind::Interconnection, "cpu.m", "mem.s")
        .unwrap();
    graph
        .add_connection("w1", ConnectionKind::Interconnection, "cpu.m", "bus.mm")
        .unwrap();
    graph
        .add_connection("w2", ConnectionKind::Interconnection, "mem.s", "cpu.m")
        .unwrap();

    let cpu = graph.find("cpu.m").unwrap();
    let mem = graph.find("mem.s").unwrap();
    let mm = graph.find("bus.mm").unwrap();
    assert_eq!(graph.links(cpu).len(), 3);
    assert_eq!(graph.neighbors(cpu).collect::<Vec<_>>(), vec![mem, mm]);
    assert_eq!(graph.neighbors(mem).collect::<Vec<_>>(), vec![cpu]);
}

/// Tests the kind reported for the edge between two interfaces.
#[test]
fn test_connection_kind_between() {
    let mut graph = create_test_graph();
    graph
        .add_connection("bus.ch", ConnectionKind::Channel, "bus.mm", "bus.ms")
        .unwrap();

    let mm = graph.find("bus.mm").unwrap();
    let ms = graph.find("bus.ms").unwrap();
    let cpu = graph.find("cpu.m").unwrap();
    assert_eq!(graph.connection_kind_between(mm, ms), Some(ConnectionKind::Channel));
    assert_eq!(graph.connection_kind_between(ms, mm), Some(ConnectionKind::Channel));
    assert_eq!(graph.connection_kind_between(cpu, ms), None);
}

/// Tests that bridge connections mark both ends as bridged.
#[test]
fn test_bridge_marks_endpoints() {
    let mut graph = ConnectivityGraph::new();
    graph
        .add_interface(ConnectivityInterface::new("br", "s", InterfaceMode::Target))
        .unwrap();
    graph
        .add_interface(ConnectivityInterface::new("br", "m", InterfaceMode::Initiator))
        .unwrap();
    graph
        .add_interface(ConnectivityInterface::new("mem", "s", InterfaceMode::Target))
        .unwrap();
    graph
        .add_connection("br.s->m", ConnectionKind::Bridge, "br.s", "br.m")
        .unwrap();
    graph
        .add_connection("w", ConnectionKind::Interconnection, "br.m", "mem.s")
        .unwrap();

    let bridged: Vec<&str> = graph
        .interfaces()
        .filter(|(_, i)| i.is_bridged())
        .map(|(_, i)| i.name())
        .collect();
    assert_eq!(bridged, vec!["br.s", "br.m"]);
}

/// Tests that mode queries are lazy, ordered and restartable.
#[test]
fn test_interfaces_of_mode() {
    let mut graph = create_test_graph();
    graph
        .add_interface(ConnectivityInterface::new("dma", "m", InterfaceMode::Initiator))
        .unwrap();

    let initiators = graph.interfaces_of_mode(InterfaceMode::Initiator);
    let first: Vec<_> = initiators.clone().collect();
    let second: Vec<_> = initiators.collect();

    assert_eq!(first, second);
    let names: Vec<&str> = first
        .iter()
        .map(|id| graph.interface(*id).unwrap().name())
        .collect();
    assert_eq!(names, vec!["cpu.m", "dma.m"]);
    assert_eq!(graph.interfaces_of_mode(InterfaceMode::Monitor).count(), 0);
}

/// Tests that memory trees are attached to interfaces by id.
#[test]
fn test_memory_attachment() {
    let mut graph = ConnectivityGraph::new();
    let map = MemoryItem::new("map", "mem.map", MemoryItemKind::MemoryMap, 8);
    let memory = graph.add_memory(map.clone());

    let with_memory = graph
        .add_interface(ConnectivityInterface::new("mem", "s", InterfaceMode::Target).with_memory(memory))
        .unwrap();
    let without = graph
        .add_interface(ConnectivityInterface::new("mem", "t", InterfaceMode::Target))
        .unwrap();

    assert_eq!(graph.memory_of(with_memory), Some(&map));
    assert_eq!(graph.memory_of(without), None);
}

/// Tests that a self-connection appears once in the adjacency.
#[test]
fn test_self_connection() {
    let mut graph = create_test_graph();
    graph
        .add_connection("loop", ConnectionKind::Interconnection, "mem.s", "mem.s")
        .unwrap();

    let mem = graph.find("mem.s").unwrap();
    assert_eq!(graph.neighbors(mem).collect::<Vec<_>>(), vec![mem]);
}
