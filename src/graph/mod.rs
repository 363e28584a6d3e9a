//! Connectivity Graph.
//!
//! This module implements the flattened interface graph of one design. It
//! owns the interfaces, the undirected connections between them and the
//! memory trees the interfaces expose. Everything is addressed by stable
//! indices, so cyclic wiring and repeated instantiation need no shared
//! ownership, and per-search state lives outside the graph.

/// Edges.
pub mod connection;

/// Hierarchy flattening from a design library.
pub mod factory;

/// Nodes.
pub mod interface;

use crate::common::{ConnectionKind, GraphError, InterfaceMode};
use crate::memory::{MemoryId, MemoryItem};
use std::collections::HashMap;

pub use connection::{ConnectionId, ConnectivityConnection};
pub use factory::{ConnectivityGraphFactory, FactoryOutput};
pub use interface::{ConnectivityInterface, InterfaceId};

/// Interface graph of one flattened design.
///
/// Adjacency is indexed by interface, so neighbour queries cost no more than
/// the number of connections touching the interface.
#[derive(Debug, Default, Clone)]
pub struct ConnectivityGraph {
    interfaces: Vec<ConnectivityInterface>,
    by_name: HashMap<String, InterfaceId>,
    connections: Vec<ConnectivityConnection>,
    adjacency: Vec<Vec<(InterfaceId, ConnectionId)>>,
    memories: Vec<MemoryItem>,
}

impl ConnectivityGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an interface to the graph.
    ///
    /// # Arguments
    ///
    /// * `interface` - The interface to add
    ///
    /// # Returns
    ///
    /// The id of the new interface, or `DuplicateIdentifier` if an interface
    /// with the same qualified name is already present.
    pub fn add_interface(&mut self, interface: ConnectivityInterface) -> Result<InterfaceId, GraphError> {
        if self.by_name.contains_key(interface.name()) {
            return Err(GraphError::DuplicateIdentifier(interface.name().to_string()));
        }

        let id = InterfaceId(self.interfaces.len());
        tracing::debug!(
            "[Graph] Registered interface: {:<40} {:<18} {}",
            interface.name(),
            interface.mode(),
            if interface.memory().is_some() { "memory" } else { "-" }
        );
        self.by_name.insert(interface.name().to_string(), id);
        self.interfaces.push(interface);
        self.adjacency.push(Vec::new());
        Ok(id)
    }

    /// Joins two interfaces by qualified name.
    ///
    /// Bridge connections also mark both endpoints as bridged.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the connection, used in diagnostics
    /// * `kind` - How the interfaces are joined
    /// * `a`, `b` - Qualified names of the endpoints
    ///
    /// # Returns
    ///
    /// The id of the new connection, or `UnknownInterface` naming the first
    /// endpoint that is not present.
    pub fn add_connection(
        &mut self,
        name: impl Into<String>,
        kind: ConnectionKind,
        a: &str,
        b: &str,
    ) -> Result<ConnectionId, GraphError> {
        let name = name.into();
        let first = self.lookup(&name, a)?;
        let second = self.lookup(&name, b)?;

        let id = ConnectionId(self.connections.len());
        tracing::debug!("[Graph] Connected {} <-> {} ({}, {})", a, b, kind, name);

        self.adjacency[first.0].push((second, id));
        if first != second {
            self.adjacency[second.0].push((first, id));
        }
        if kind == ConnectionKind::Bridge {
            self.interfaces[first.0].mark_bridged();
            self.interfaces[second.0].mark_bridged();
        }
        self.connections
            .push(ConnectivityConnection::new(name, kind, first, second));
        Ok(id)
    }

    /// Stores a memory tree and returns its id.
    pub fn add_memory(&mut self, item: MemoryItem) -> MemoryId {
        let id = MemoryId(self.memories.len());
        self.memories.push(item);
        id
    }

    /// Iterates the interfaces of one mode in insertion order.
    ///
    /// The iterator is lazy; call again to restart.
    pub fn interfaces_of_mode(&self, mode: InterfaceMode) -> impl Iterator<Item = InterfaceId> + Clone + '_ {
        self.interfaces
            .iter()
            .enumerate()
            .filter(move |(_, i)| i.mode() == mode)
            .map(|(idx, _)| InterfaceId(idx))
    }

    /// Iterates the interfaces directly connected to `id`, over every kind
    /// of connection, in order of their first connection.
    ///
    /// An interface joined by several connections appears once.
    pub fn neighbors(&self, id: InterfaceId) -> impl Iterator<Item = InterfaceId> + '_ {
        let mut seen = Vec::new();
        self.links(id).iter().filter_map(move |&(other, _)| {
            if seen.contains(&other) {
                None
            } else {
                seen.push(other);
                Some(other)
            }
        })
    }

    /// Returns the `(neighbour, connection)` pairs of `id`.
    pub fn links(&self, id: InterfaceId) -> &[(InterfaceId, ConnectionId)] {
        self.adjacency.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the kind of the first connection joining `a` and `b`.
    pub fn connection_kind_between(&self, a: InterfaceId, b: InterfaceId) -> Option<ConnectionKind> {
        self.links(a)
            .iter()
            .find(|(other, _)| *other == b)
            .map(|(_, conn)| self.connections[conn.0].kind())
    }

    pub fn interface(&self, id: InterfaceId) -> Option<&ConnectivityInterface> {
        self.interfaces.get(id.0)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&ConnectivityConnection> {
        self.connections.get(id.0)
    }

    /// Looks up an interface by qualified name.
    pub fn find(&self, name: &str) -> Option<InterfaceId> {
        self.by_name.get(name).copied()
    }

    pub fn memory(&self, id: MemoryId) -> Option<&MemoryItem> {
        self.memories.get(id.0)
    }

    /// Returns the memory tree exposed by an interface.
    pub fn memory_of(&self, id: InterfaceId) -> Option<&MemoryItem> {
        self.interface(id)
            .and_then(ConnectivityInterface::memory)
            .and_then(|m| self.memory(m))
    }

    /// Iterates all interfaces with their ids.
    pub fn interfaces(&self) -> impl Iterator<Item = (InterfaceId, &ConnectivityInterface)> + '_ {
        self.interfaces
            .iter()
            .enumerate()
            .map(|(idx, i)| (InterfaceId(idx), i))
    }

    pub fn connections(&self) -> &[ConnectivityConnection] {
        &self.connections
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    fn lookup(&self, connection: &str, name: &str) -> Result<InterfaceId, GraphError> {
        self.find(name).ok_or_else(|| GraphError::UnknownInterface {
            connection: connection.to_string(),
            interface: name.to_string(),
        })
    }
}
