//! Design Library Model.
//!
//! This module defines the input side of the analysis: a library of
//! components and designs as produced by an external document loader. The
//! model mirrors the source documents closely and keeps every numeric field
//! as an unevaluated expression string; evaluation happens later through an
//! [`ExpressionEvaluator`](crate::common::ExpressionEvaluator).

/// Components, bus interfaces and channels.
pub mod component;

/// TOML and JSON library loading.
pub mod loader;

/// Memory maps, address blocks, registers, fields, address spaces and segments.
pub mod memory;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use component::{BusInterface, Channel, Component};
pub use memory::{AddressBlock, AddressSpace, Field, MemoryMap, Register, Segment};

/// A collection of components and designs plus shared parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    /// Named parameters usable inside any expression of the library.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,

    #[serde(default)]
    pub components: Vec<Component>,

    #[serde(default)]
    pub designs: Vec<Design>,
}

impl Library {
    /// Looks up a component by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Looks up a design by name.
    pub fn design(&self, name: &str) -> Option<&Design> {
        self.designs.iter().find(|d| d.name == name)
    }
}

/// One level of a hierarchical design.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Design {
    pub name: String,

    #[serde(default)]
    pub instances: Vec<ComponentInstance>,

    #[serde(default)]
    pub interconnections: Vec<Interconnection>,
}

/// Instantiation of a component inside a design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInstance {
    pub name: String,
    pub component: String,
}

/// A wire between bus interfaces of one design level.
///
/// The first endpoint is the start of the interconnection and is joined to
/// every other endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interconnection {
    #[serde(default)]
    pub name: String,

    pub endpoints: Vec<Endpoint>,
}

/// One end of an interconnection.
///
/// Without an instance the endpoint names a bus interface of the component
/// that contains the design (a hierarchical interface).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub instance: Option<String>,

    pub bus: String,
}

impl Endpoint {
    /// Endpoint on a bus interface of a component instance.
    pub fn instance(instance: impl Into<String>, bus: impl Into<String>) -> Self {
        Self {
            instance: Some(instance.into()),
            bus: bus.into(),
        }
    }

    /// Endpoint on a bus interface of the enclosing component.
    pub fn hierarchical(bus: impl Into<String>) -> Self {
        Self {
            instance: None,
            bus: bus.into(),
        }
    }

    /// Returns `true` if this endpoint leaves the design level.
    pub fn is_hierarchical(&self) -> bool {
        self.instance.is_none()
    }
}
