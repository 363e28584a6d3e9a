//! Bus Interface Roles.
//!
//! This module defines the classification of bus interfaces and of the
//! edges that join them. Interface modes decide where a path search may
//! start, where it may end, and which edges it may follow; connection kinds
//! record how two interfaces came to be joined.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol role of a bus interface.
///
/// Accepts both the current (`initiator`/`target`) and the legacy
/// (`master`/`slave`) spelling when deserialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterfaceMode {
    /// Originates memory-mapped transactions.
    ///
    /// May reference an address space and carry a base address that offsets
    /// everything it reaches.
    #[serde(alias = "master")]
    Initiator,

    /// Accepts memory-mapped transactions.
    ///
    /// May reference a memory map exposed to connected initiators.
    #[serde(alias = "slave")]
    Target,

    /// System-level signals (clocks, resets).
    System,

    /// Initiator side of an interconnect, facing a real initiator.
    #[serde(alias = "mirroredMaster")]
    MirroredInitiator,

    /// Target side of an interconnect, facing a real target.
    ///
    /// The address translation point: a remap address on this interface is
    /// added to every address seen through it.
    #[serde(alias = "mirroredSlave")]
    MirroredTarget,

    /// Mirrored system-level signals.
    MirroredSystem,

    /// Passive observer of another interface.
    Monitor,
}

impl InterfaceMode {
    /// Returns `true` for modes that seed a path search.
    pub fn is_initiator(self) -> bool {
        matches!(self, InterfaceMode::Initiator | InterfaceMode::MirroredInitiator)
    }

    /// Returns `true` for modes that may end a path search.
    pub fn is_target(self) -> bool {
        matches!(self, InterfaceMode::Target | InterfaceMode::MirroredTarget)
    }

    /// Returns the name used in design descriptions.
    pub fn as_str(self) -> &'static str {
        match self {
            InterfaceMode::Initiator => "initiator",
            InterfaceMode::Target => "target",
            InterfaceMode::System => "system",
            InterfaceMode::MirroredInitiator => "mirroredInitiator",
            InterfaceMode::MirroredTarget => "mirroredTarget",
            InterfaceMode::MirroredSystem => "mirroredSystem",
            InterfaceMode::Monitor => "monitor",
        }
    }
}

impl fmt::Display for InterfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How two interfaces were joined in the design.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    /// A design-level interconnection between two instances.
    Interconnection,

    /// Two interfaces grouped in the same channel of an interconnect component.
    Channel,

    /// A transparent bridge from a target interface to an initiator interface
    /// of the same component.
    Bridge,

    /// A pass-through from an interface inside a sub-design to the matching
    /// interface of the hierarchical instance that contains it.
    Hierarchical,
}

impl ConnectionKind {
    /// Returns `true` if an initiator-mode interface may be entered through
    /// this kind of edge.
    pub fn enters_initiator(self) -> bool {
        matches!(self, ConnectionKind::Bridge | ConnectionKind::Hierarchical)
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionKind::Interconnection => "interconnection",
            ConnectionKind::Channel => "channel",
            ConnectionKind::Bridge => "bridge",
            ConnectionKind::Hierarchical => "hierarchical",
        };
        f.write_str(name)
    }
}
