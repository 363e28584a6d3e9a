//! Component descriptions.

use super::memory::{AddressSpace, MemoryMap};
use crate::common::InterfaceMode;
use serde::{Deserialize, Serialize};

/// A reusable hardware component.
///
/// A component with a `design` is hierarchical: its instances are expanded
/// into the design's own instances during graph construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,

    #[serde(default)]
    pub bus_interfaces: Vec<BusInterface>,

    #[serde(default)]
    pub memory_maps: Vec<MemoryMap>,

    #[serde(default)]
    pub address_spaces: Vec<AddressSpace>,

    #[serde(default)]
    pub channels: Vec<Channel>,

    /// Name of the design implementing this component, if any.
    #[serde(default)]
    pub design: Option<String>,
}

impl Component {
    /// Creates an empty component.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Looks up a bus interface by name.
    pub fn bus_interface(&self, name: &str) -> Option<&BusInterface> {
        self.bus_interfaces.iter().find(|b| b.name == name)
    }

    /// Looks up a memory map by name.
    pub fn memory_map(&self, name: &str) -> Option<&MemoryMap> {
        self.memory_maps.iter().find(|m| m.name == name)
    }

    /// Looks up an address space by name.
    pub fn address_space(&self, name: &str) -> Option<&AddressSpace> {
        self.address_spaces.iter().find(|s| s.name == name)
    }

    /// Returns `true` if the component is implemented by a design.
    pub fn is_hierarchical(&self) -> bool {
        self.design.is_some()
    }
}

/// A bus interface declared on a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusInterface {
    pub name: String,
    pub mode: InterfaceMode,

    /// Memory map exposed through a target interface.
    #[serde(default)]
    pub memory_map: Option<String>,

    /// Address space behind an initiator interface.
    #[serde(default)]
    pub address_space: Option<String>,

    /// Base address applied to everything an initiator reaches.
    #[serde(default)]
    pub base_address: Option<String>,

    /// Address translation of a mirrored target interface.
    #[serde(default)]
    pub remap_address: Option<String>,

    #[serde(default)]
    pub remap_range: Option<String>,

    /// Initiator interfaces of the same component this target bridges to.
    #[serde(default)]
    pub bridges: Vec<String>,
}

impl BusInterface {
    /// Creates an interface with no memory, addressing or bridge data.
    pub fn new(name: impl Into<String>, mode: InterfaceMode) -> Self {
        Self {
            name: name.into(),
            mode,
            memory_map: None,
            address_space: None,
            base_address: None,
            remap_address: None,
            remap_range: None,
            bridges: Vec::new(),
        }
    }
}

/// A group of interfaces of an interconnect component that are all joined
/// to each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub interfaces: Vec<String>,
}
