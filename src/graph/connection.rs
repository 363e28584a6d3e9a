//! Graph edges.

use super::interface::InterfaceId;
use crate::common::ConnectionKind;

/// Stable index of a connection in a [`ConnectivityGraph`](super::ConnectivityGraph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub(crate) usize);

impl ConnectionId {
    /// Returns the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Undirected edge between two interfaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectivityConnection {
    name: String,
    kind: ConnectionKind,
    endpoints: (InterfaceId, InterfaceId),
}

impl ConnectivityConnection {
    pub(crate) fn new(name: String, kind: ConnectionKind, a: InterfaceId, b: InterfaceId) -> Self {
        Self {
            name,
            kind,
            endpoints: (a, b),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    pub fn endpoints(&self) -> (InterfaceId, InterfaceId) {
        self.endpoints
    }

    /// Returns the endpoint opposite to `id`, or `None` if `id` is not an
    /// endpoint.
    pub fn other(&self, id: InterfaceId) -> Option<InterfaceId> {
        match self.endpoints {
            (a, b) if a == id => Some(b),
            (a, b) if b == id => Some(a),
            _ => None,
        }
    }
}
