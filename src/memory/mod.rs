//! Memory item trees.
//!
//! A memory item is the evaluated form of an address space, segment, memory
//! map, address block, register or field. Trees are built per component
//! instance and stored in the connectivity graph's memory arena.

/// Evaluation of design memory descriptions into trees.
pub mod builder;

/// The memory item sum type.
pub mod item;

pub use builder::MemoryBuilder;
pub use item::{MemoryId, MemoryItem, MemoryItemKind};
