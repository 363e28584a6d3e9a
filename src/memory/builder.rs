//! Memory Tree Builder.
//!
//! This module evaluates the memory descriptions of one component instance
//! into [`MemoryItem`] trees. Identifiers are qualified with the instance
//! path so that two instances of the same component produce distinct trees.
//!
//! Evaluation failures never abort a build. An element whose address, range
//! or width cannot be evaluated is skipped; an element whose presence cannot
//! be evaluated is kept. Both cases record a [`Diagnostic`].

use super::item::{MemoryItem, MemoryItemKind};
use crate::common::{Diagnostic, ExpressionEvaluator, ResolutionError};
use crate::design::{AddressBlock, AddressSpace, Field, MemoryMap, Register, Segment};

/// Builds evaluated memory trees from design descriptions.
pub struct MemoryBuilder<'a, E: ?Sized> {
    evaluator: &'a E,
    default_aub: u64,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, E> MemoryBuilder<'a, E>
where
    E: ExpressionEvaluator + ?Sized,
{
    /// Creates a builder.
    ///
    /// # Arguments
    ///
    /// * `evaluator` - Evaluator for every expression in the descriptions
    /// * `default_aub` - Address unit bits used when a container declares none
    pub fn new(evaluator: &'a E, default_aub: u64) -> Self {
        Self {
            evaluator,
            default_aub: default_aub.max(1),
            diagnostics: Vec::new(),
        }
    }

    /// Drains the recorded diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Builds the tree of a memory map.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Instance path qualifying the identifiers
    /// * `map` - The memory map description
    ///
    /// # Returns
    ///
    /// The memory map item, or `None` if the map is not present.
    pub fn build_memory_map(&mut self, prefix: &str, map: &MemoryMap) -> Option<MemoryItem> {
        let identifier = qualify(prefix, &map.name);
        if !self.is_present(&identifier, map.is_present.as_deref()) {
            tracing::debug!("[Memory] Skipping non-present memory map {}", identifier);
            return None;
        }

        let aub = self.aub(&identifier, map.aub.as_deref());
        let mut item = MemoryItem::new(&map.name, &identifier, MemoryItemKind::MemoryMap, aub);
        for block in &map.address_blocks {
            if let Some(child) = self.build_address_block(&identifier, block, aub) {
                item.children.push(child);
            }
        }
        Some(item)
    }

    /// Builds the tree of an address space.
    pub fn build_address_space(&mut self, prefix: &str, space: &AddressSpace) -> Option<MemoryItem> {
        let identifier = qualify(prefix, &space.name);
        let aub = self.aub(&identifier, space.aub.as_deref());
        let range = self.value(&identifier, "range", &space.range)?;
        let width = self.value(&identifier, "width", &space.width)?;

        let mut item = MemoryItem::new(&space.name, &identifier, MemoryItemKind::AddressSpace, aub)
            .with_range(range)
            .with_width(width);
        for segment in &space.segments {
            if let Some(child) = self.build_segment(&identifier, segment, aub) {
                item.children.push(child);
            }
        }
        Some(item)
    }

    fn build_segment(&mut self, parent: &str, segment: &Segment, aub: u64) -> Option<MemoryItem> {
        let identifier = qualify(parent, &segment.name);
        if !self.is_present(&identifier, segment.is_present.as_deref()) {
            return None;
        }

        let offset = self.value(&identifier, "offset", &segment.offset)?;
        let range = self.value(&identifier, "range", &segment.range)?;
        Some(
            MemoryItem::new(&segment.name, identifier, MemoryItemKind::Segment { offset }, aub)
                .with_range(range),
        )
    }

    fn build_address_block(
        &mut self,
        parent: &str,
        block: &AddressBlock,
        aub: u64,
    ) -> Option<MemoryItem> {
        let identifier = qualify(parent, &block.name);
        if !self.is_present(&identifier, block.is_present.as_deref()) {
            return None;
        }

        let base = self.value(&identifier, "base address", &block.base_address)?;
        let range = self.value(&identifier, "range", &block.range)?;
        let width = self.value(&identifier, "width", &block.width)?;

        let mut item = MemoryItem::new(&block.name, &identifier, MemoryItemKind::AddressBlock, aub)
            .with_address(base)
            .with_range(range)
            .with_width(width);
        for register in &block.registers {
            self.build_register(&identifier, register, aub, range, &mut item.children);
        }
        Some(item)
    }

    /// Appends one item per register element to `out`.
    ///
    /// Array elements are named `name[i]` and follow each other every
    /// `size / aub` units. Elements starting at or past `block_range` are
    /// dropped with an `ArrayTruncated` diagnostic; the first element is
    /// always kept.
    fn build_register(
        &mut self,
        parent: &str,
        register: &Register,
        aub: u64,
        block_range: u64,
        out: &mut Vec<MemoryItem>,
    ) {
        let identifier = qualify(parent, &register.name);
        if !self.is_present(&identifier, register.is_present.as_deref()) {
            return;
        }

        let Some(offset) = self.value(&identifier, "offset", &register.offset) else {
            return;
        };
        let Some(size) = self.value(&identifier, "size", &register.size) else {
            return;
        };

        let dimension = match non_empty(register.dimension.as_deref()) {
            Some(expression) => match self.value(&identifier, "dimension", expression) {
                Some(count) => Some(count),
                None => return,
            },
            None => None,
        };

        let stride = size.div_ceil(aub);
        let mut elements = dimension.map_or(1, |count| count.max(1));
        if dimension.is_some() {
            let capacity = match block_range.checked_sub(offset) {
                Some(room) if stride > 0 => room.div_ceil(stride).max(1),
                _ => 1,
            };
            if elements > capacity {
                self.report(Diagnostic::ArrayTruncated {
                    register: identifier.clone(),
                    dimension: elements,
                    kept: capacity,
                });
                elements = capacity;
            }
        }
        for index in 0..elements {
            let Some(address) = index
                .checked_mul(stride)
                .and_then(|step| offset.checked_add(step))
            else {
                self.report(Diagnostic::Resolution(ResolutionError::AddressOverflow {
                    context: identifier.clone(),
                }));
                return;
            };

            let (name, element_identifier) = match dimension {
                Some(_) => (
                    format!("{}[{}]", register.name, index),
                    format!("{}[{}]", identifier, index),
                ),
                None => (register.name.clone(), identifier.clone()),
            };

            let kind = MemoryItemKind::Register {
                size,
                index: dimension.map(|_| index),
            };
            let mut item = MemoryItem::new(name, &element_identifier, kind, aub).with_address(address);
            for field in &register.fields {
                if let Some(child) = self.build_field(&element_identifier, field, aub) {
                    item.children.push(child);
                }
            }
            out.push(item);
        }
    }

    fn build_field(&mut self, parent: &str, field: &Field, aub: u64) -> Option<MemoryItem> {
        let identifier = qualify(parent, &field.name);
        if !self.is_present(&identifier, field.is_present.as_deref()) {
            return None;
        }

        let bit_offset = self.value(&identifier, "bit offset", &field.bit_offset)?;
        let bit_width = self.value(&identifier, "bit width", &field.bit_width)?;
        let kind = MemoryItemKind::Field {
            offset_bits: bit_offset % aub,
        };
        Some(
            MemoryItem::new(&field.name, identifier, kind, aub)
                .with_address(bit_offset / aub)
                .with_width(bit_width),
        )
    }

    /// Evaluates a presence expression. Absent, empty and failing
    /// expressions count as present.
    fn is_present(&mut self, identifier: &str, expression: Option<&str>) -> bool {
        let Some(expression) = non_empty(expression) else {
            return true;
        };

        match self.evaluator.evaluate(expression) {
            Ok(value) => value != 0,
            Err(source) => {
                self.report(Diagnostic::Expression {
                    context: format!("presence of {}", identifier),
                    source,
                });
                true
            }
        }
    }

    fn aub(&mut self, identifier: &str, expression: Option<&str>) -> u64 {
        match non_empty(expression) {
            Some(expression) => match self.value(identifier, "address unit bits", expression) {
                Some(0) | None => self.default_aub,
                Some(aub) => aub,
            },
            None => self.default_aub,
        }
    }

    fn value(&mut self, identifier: &str, attribute: &str, expression: &str) -> Option<u64> {
        let context = format!("{} of {}", attribute, identifier);
        match self.evaluator.evaluate(expression) {
            Ok(value) if value < 0 => {
                self.report(Diagnostic::Resolution(ResolutionError::NegativeValue {
                    context,
                    value,
                }));
                None
            }
            Ok(value) => match u64::try_from(value) {
                Ok(value) => Some(value),
                Err(_) => {
                    self.report(Diagnostic::Resolution(ResolutionError::AddressOverflow {
                        context,
                    }));
                    None
                }
            },
            Err(source) => {
                self.report(Diagnostic::Expression { context, source });
                None
            }
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("[Memory] {}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn non_empty(expression: Option<&str>) -> Option<&str> {
    expression.filter(|e| !e.trim().is_empty())
}
