//! Address Region Traits.
//!
//! This module defines the common interface of the sibling regions checked
//! by the [`MemoryRegionValidator`](super::validator::MemoryRegionValidator).
//! Address blocks, segments and registers all expose a name, a base address
//! and a range as expressions, which lets the validator handle them
//! uniformly.

use crate::design::{AddressBlock, Segment};
use std::fmt;

/// A named region of a memory container.
pub trait AddressRegion {
    /// Returns the region name.
    ///
    /// Used for name checks and in every diagnostic.
    fn name(&self) -> &str;

    /// Returns the base address expression, relative to the container.
    fn base_address(&self) -> &str;

    /// Returns the range expression, in address units.
    fn range(&self) -> &str;

    /// Returns the width expression in bits, if the region has a width.
    fn width(&self) -> Option<&str> {
        None
    }

    /// Returns the presence expression, if any.
    ///
    /// A region whose presence evaluates to 0 takes no address space.
    fn is_present(&self) -> Option<&str> {
        None
    }

    /// Returns why the range is unusable when that is known before
    /// evaluating `range()`.
    fn range_failure(&self) -> Option<&str> {
        None
    }
}

/// Free-standing region description.
///
/// Used for regions derived from other descriptions, such as registers, and
/// for callers that do not start from a design library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub base_address: String,
    pub range: String,
    pub width: Option<String>,
    pub is_present: Option<String>,
    pub range_failure: Option<String>,
}

impl Region {
    pub fn new(
        name: impl Into<String>,
        base_address: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_address: base_address.into(),
            range: range.into(),
            width: None,
            is_present: None,
            range_failure: None,
        }
    }

    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn with_presence(mut self, expression: impl Into<String>) -> Self {
        self.is_present = Some(expression.into());
        self
    }

    /// Marks the range as unusable for `reason`.
    pub fn with_range_failure(mut self, reason: impl Into<String>) -> Self {
        self.range_failure = Some(reason.into());
        self
    }
}

impl AddressRegion for Region {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_address(&self) -> &str {
        &self.base_address
    }

    fn range(&self) -> &str {
        &self.range
    }

    fn width(&self) -> Option<&str> {
        self.width.as_deref()
    }

    fn is_present(&self) -> Option<&str> {
        self.is_present.as_deref()
    }

    fn range_failure(&self) -> Option<&str> {
        self.range_failure.as_deref()
    }
}

impl AddressRegion for AddressBlock {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_address(&self) -> &str {
        &self.base_address
    }

    fn range(&self) -> &str {
        &self.range
    }

    fn width(&self) -> Option<&str> {
        Some(&self.width)
    }

    fn is_present(&self) -> Option<&str> {
        self.is_present.as_deref()
    }
}

impl AddressRegion for Segment {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_address(&self) -> &str {
        &self.offset
    }

    fn range(&self) -> &str {
        &self.range
    }

    fn is_present(&self) -> Option<&str> {
        self.is_present.as_deref()
    }
}

impl<R: AddressRegion + ?Sized> AddressRegion for &R {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn base_address(&self) -> &str {
        (**self).base_address()
    }

    fn range(&self) -> &str {
        (**self).range()
    }

    fn width(&self) -> Option<&str> {
        (**self).width()
    }

    fn is_present(&self) -> Option<&str> {
        (**self).is_present()
    }

    fn range_failure(&self) -> Option<&str> {
        (**self).range_failure()
    }
}

/// Closed interval `[start, end]` of address units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    /// Builds the span of a region with a non-zero range.
    ///
    /// Returns `None` for an empty range or one that runs past `u64::MAX`.
    pub fn from_base_and_range(base: u64, range: u64) -> Option<Self> {
        if range == 0 {
            return None;
        }
        let end = base.checked_add(range - 1)?;
        Some(Self { start: base, end })
    }

    fn contains(&self, address: u64) -> bool {
        address >= self.start && address <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x}, {:#x}]", self.start, self.end)
    }
}

/// Returns `true` if either span has an endpoint inside the other.
///
/// Symmetric in its arguments.
pub fn overlaps(first: &Span, second: &Span) -> bool {
    first.contains(second.start)
        || first.contains(second.end)
        || second.contains(first.start)
        || second.contains(first.end)
}
