//! Evaluated memory items.

use std::fmt;

/// Index of a memory item tree in the graph's memory arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemoryId(pub(crate) usize);

impl MemoryId {
    /// Returns the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind of a memory item together with its kind-specific payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryItemKind {
    AddressSpace,

    /// Portion of an address space starting `offset` units into it.
    Segment { offset: u64 },

    MemoryMap,

    AddressBlock,

    /// Register of `size` bits. `index` is set for elements of a register
    /// array.
    Register { size: u64, index: Option<u64> },

    /// Bit field starting `offset_bits` bits into its address unit.
    Field { offset_bits: u64 },
}

impl MemoryItemKind {
    /// Returns the type label used in memory listings.
    pub fn label(&self) -> &'static str {
        match self {
            MemoryItemKind::AddressSpace => "addressSpace",
            MemoryItemKind::Segment { .. } => "segment",
            MemoryItemKind::MemoryMap => "memoryMap",
            MemoryItemKind::AddressBlock => "addressBlock",
            MemoryItemKind::Register { .. } => "register",
            MemoryItemKind::Field { .. } => "field",
        }
    }

    /// Returns `true` for the kinds a target interface can expose as the
    /// root of its memory.
    pub fn is_root(&self) -> bool {
        matches!(self, MemoryItemKind::AddressSpace | MemoryItemKind::MemoryMap)
    }
}

impl fmt::Display for MemoryItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A node of an evaluated memory tree.
///
/// `address` is relative to the immediate container. `range` is in address
/// units, `width` in bits; either is 0 where the kind has none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryItem {
    pub name: String,
    pub identifier: String,
    pub kind: MemoryItemKind,
    pub address: u64,
    pub range: u64,
    pub width: u64,
    pub aub: u64,
    pub children: Vec<MemoryItem>,
}

impl MemoryItem {
    /// Creates a leaf item with zero address, range and width.
    pub fn new(
        name: impl Into<String>,
        identifier: impl Into<String>,
        kind: MemoryItemKind,
        aub: u64,
    ) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            kind,
            address: 0,
            range: 0,
            width: 0,
            aub,
            children: Vec::new(),
        }
    }

    pub fn with_address(mut self, address: u64) -> Self {
        self.address = address;
        self
    }

    pub fn with_range(mut self, range: u64) -> Self {
        self.range = range;
        self
    }

    pub fn with_width(mut self, width: u64) -> Self {
        self.width = width;
        self
    }

    pub fn with_child(mut self, child: MemoryItem) -> Self {
        self.children.push(child);
        self
    }
}
