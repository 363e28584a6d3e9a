//! Resolved memory listing.
//!
//! Renders resolved regions as a semicolon-separated table, one row per
//! region in depth-first order. Which columns a row fills depends on its
//! kind:
//!
//! | Kind          | Range | Width | Size | Offset |
//! |---------------|-------|-------|------|--------|
//! | memory map    |       |       |      |        |
//! | address space |       |       |      |        |
//! | address block | x     | x     |      |        |
//! | register      |       |       | x    |        |
//! | field         |       | x     |      | x      |
//! | segment       | x     |       |      | x      |

use crate::analysis::ResolvedRegion;
use crate::memory::MemoryItemKind;
use std::io::{self, Write};

/// First line of every listing.
pub const HEADER: &str = "Identifier;Type;Address;Range (AUB);Width (bits);Size (bits);Offset (bits);";

/// Which levels of the memory trees to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    pub include_registers: bool,
    /// Ignored when registers are excluded.
    pub include_fields: bool,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            include_registers: true,
            include_fields: true,
        }
    }
}

/// Formats the row of one region, without a line terminator.
pub fn format_row(region: &ResolvedRegion) -> String {
    let blank = String::new;
    let (range, width, size, offset) = match region.kind {
        MemoryItemKind::MemoryMap | MemoryItemKind::AddressSpace => (blank(), blank(), blank(), blank()),
        MemoryItemKind::AddressBlock => (
            region.range.to_string(),
            region.width.to_string(),
            blank(),
            blank(),
        ),
        MemoryItemKind::Register { .. } => (blank(), blank(), region.size.to_string(), blank()),
        MemoryItemKind::Field { .. } => (
            blank(),
            region.width.to_string(),
            blank(),
            region.offset.to_string(),
        ),
        MemoryItemKind::Segment { .. } => (
            region.range.to_string(),
            blank(),
            blank(),
            region.offset.to_string(),
        ),
    };

    format!(
        "{};{};{:#x};{};{};{};{};",
        region.identifier,
        region.kind.label(),
        region.address,
        range,
        width,
        size,
        offset
    )
}

/// Writes the header and one row per listed region.
pub fn write_listing<W: Write>(
    out: &mut W,
    regions: &[ResolvedRegion],
    options: ListingOptions,
) -> io::Result<()> {
    writeln!(out, "{}", HEADER)?;
    for region in regions {
        write_region(out, region, options)?;
    }
    Ok(())
}

/// Renders a complete listing into a string.
pub fn render_listing(regions: &[ResolvedRegion], options: ListingOptions) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_listing(&mut buffer, regions, options);
    String::from_utf8_lossy(&buffer).into_owned()
}

fn write_region<W: Write>(out: &mut W, region: &ResolvedRegion, options: ListingOptions) -> io::Result<()> {
    let listed = match region.kind {
        MemoryItemKind::Register { .. } => options.include_registers,
        MemoryItemKind::Field { .. } => options.include_registers && options.include_fields,
        _ => true,
    };
    if !listed {
        return Ok(());
    }

    writeln!(out, "{}", format_row(region))?;
    for child in &region.children {
        write_region(out, child, options)?;
    }
    Ok(())
}
