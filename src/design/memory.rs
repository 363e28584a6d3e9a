//! Memory descriptions of a component.
//!
//! Every numeric attribute is an expression string. Optional `is_present`
//! expressions decide whether an element exists at all; an absent or empty
//! expression means present.

use serde::{Deserialize, Serialize};

/// Target-side view of a component's memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryMap {
    pub name: String,

    /// Address unit bits. Defaults to the configured value when absent.
    #[serde(default)]
    pub aub: Option<String>,

    #[serde(default)]
    pub is_present: Option<String>,

    #[serde(default)]
    pub address_blocks: Vec<AddressBlock>,
}

/// A contiguous region of a memory map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressBlock {
    pub name: String,
    pub base_address: String,
    pub range: String,
    pub width: String,

    #[serde(default)]
    pub is_present: Option<String>,

    #[serde(default)]
    pub registers: Vec<Register>,
}

/// A register inside an address block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Register {
    pub name: String,

    /// Offset from the start of the block, in address units.
    pub offset: String,

    /// Size in bits.
    pub size: String,

    /// Number of array elements; absent for a scalar register.
    #[serde(default)]
    pub dimension: Option<String>,

    #[serde(default)]
    pub is_present: Option<String>,

    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A bit field inside a register.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub bit_offset: String,
    pub bit_width: String,

    #[serde(default)]
    pub is_present: Option<String>,
}

/// Initiator-side view of addressable memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressSpace {
    pub name: String,
    pub range: String,
    pub width: String,

    #[serde(default)]
    pub aub: Option<String>,

    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// A named portion of an address space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub offset: String,
    pub range: String,

    #[serde(default)]
    pub is_present: Option<String>,
}
