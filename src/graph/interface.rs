//! Graph nodes.

use crate::common::InterfaceMode;
use crate::memory::MemoryId;
use std::fmt;

/// Stable index of an interface in a [`ConnectivityGraph`](super::ConnectivityGraph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceId(pub(crate) usize);

impl InterfaceId {
    /// Returns the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One bus interface on one component instance.
///
/// The qualified name `instance_path.bus` is unique within a graph.
/// Addressing attributes stay as expressions until a path is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectivityInterface {
    name: String,
    bus: String,
    instance_path: String,
    mode: InterfaceMode,
    memory: Option<MemoryId>,
    base_address: Option<String>,
    remap_address: Option<String>,
    remap_range: Option<String>,
    bridged: bool,
    hierarchical: bool,
}

impl ConnectivityInterface {
    /// Creates an interface named `instance_path.bus`.
    pub fn new(instance_path: impl Into<String>, bus: impl Into<String>, mode: InterfaceMode) -> Self {
        let instance_path = instance_path.into();
        let bus = bus.into();
        let name = if instance_path.is_empty() {
            bus.clone()
        } else {
            format!("{}.{}", instance_path, bus)
        };

        Self {
            name,
            bus,
            instance_path,
            mode,
            memory: None,
            base_address: None,
            remap_address: None,
            remap_range: None,
            bridged: false,
            hierarchical: false,
        }
    }

    pub fn with_memory(mut self, memory: MemoryId) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_base_address(mut self, expression: impl Into<String>) -> Self {
        self.base_address = Some(expression.into());
        self
    }

    /// Sets the address translation applied by a mirrored target.
    pub fn with_remap(mut self, address: impl Into<String>, range: Option<String>) -> Self {
        self.remap_address = Some(address.into());
        self.remap_range = range;
        self
    }

    /// Marks the interface as the outer end of a hierarchical pass-through.
    pub fn hierarchical(mut self) -> Self {
        self.hierarchical = true;
        self
    }

    /// Qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bus interface name without the instance path.
    pub fn bus(&self) -> &str {
        &self.bus
    }

    pub fn instance_path(&self) -> &str {
        &self.instance_path
    }

    pub fn mode(&self) -> InterfaceMode {
        self.mode
    }

    pub fn memory(&self) -> Option<MemoryId> {
        self.memory
    }

    pub fn base_address(&self) -> Option<&str> {
        self.base_address.as_deref()
    }

    pub fn remap_address(&self) -> Option<&str> {
        self.remap_address.as_deref()
    }

    pub fn remap_range(&self) -> Option<&str> {
        self.remap_range.as_deref()
    }

    /// Returns `true` if a bridge connection touches this interface.
    pub fn is_bridged(&self) -> bool {
        self.bridged
    }

    pub fn is_hierarchical(&self) -> bool {
        self.hierarchical
    }

    pub(crate) fn mark_bridged(&mut self) {
        self.bridged = true;
    }
}
