//! Address resolution along a path.
//!
//! The absolute address of the memory at the end of a path is the sum of:
//!
//! * the base address of the initiator that seeds the path (0 when absent),
//! * the remap address of every mirrored target crossed on the way,
//! * the memory item's own address relative to its container.
//!
//! Children are placed at their parent's absolute address plus their own
//! relative address. All arithmetic is on `u64`; overflow, negative operands
//! and evaluator failures fail the single path and are reported.

use super::path_search::PathResult;
use crate::common::{Diagnostic, ExpressionEvaluator, InterfaceMode, ResolutionError};
use crate::graph::{ConnectivityGraph, ConnectivityInterface, InterfaceId};
use crate::memory::{MemoryItem, MemoryItemKind};
use std::collections::HashSet;

/// A memory item placed at its absolute address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRegion {
    pub identifier: String,
    pub kind: MemoryItemKind,
    pub address: u64,
    /// Range in address units.
    pub range: u64,
    /// Width in bits.
    pub width: u64,
    /// Register size in bits, 0 for other kinds.
    pub size: u64,
    /// Field bit offset within its address unit, or segment offset.
    pub offset: u64,
    pub children: Vec<ResolvedRegion>,
}

impl ResolvedRegion {
    /// Visits this region and its descendants in listing order.
    pub fn walk<'r>(&'r self, visit: &mut impl FnMut(&'r ResolvedRegion)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Counts this region and its descendants.
    pub fn region_count(&self) -> usize {
        1 + self.children.iter().map(ResolvedRegion::region_count).sum::<usize>()
    }
}

/// Regions resolved from a set of paths, plus the failures.
#[derive(Debug, Default, Clone)]
pub struct ResolutionOutcome {
    pub regions: Vec<ResolvedRegion>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolves paths over one graph.
pub struct AddressResolver<'a, E: ?Sized> {
    graph: &'a ConnectivityGraph,
    evaluator: &'a E,
}

impl<'a, E> AddressResolver<'a, E>
where
    E: ExpressionEvaluator + ?Sized,
{
    pub fn new(graph: &'a ConnectivityGraph, evaluator: &'a E) -> Self {
        Self { graph, evaluator }
    }

    /// Computes the offset a path adds in front of its terminal memory.
    ///
    /// # Returns
    ///
    /// The initiator base address plus every mirrored-target remap address
    /// on the path.
    pub fn offset(&self, path: &PathResult) -> Result<u64, ResolutionError> {
        let mut offset = match self.interface(path.initiator())?.base_address() {
            Some(expression) if !expression.trim().is_empty() => {
                let name = self.interface(path.initiator())?.name();
                self.evaluate(&format!("base address of {}", name), expression)?
            }
            _ => 0,
        };

        for &id in path.interfaces() {
            let interface = self.interface(id)?;
            if interface.mode() != InterfaceMode::MirroredTarget {
                continue;
            }
            let Some(expression) = interface.remap_address() else {
                continue;
            };
            if expression.trim().is_empty() {
                continue;
            }

            let context = format!("remap address of {}", interface.name());
            let remap = self.evaluate(&context, expression)?;
            offset = offset
                .checked_add(remap)
                .ok_or(ResolutionError::AddressOverflow { context })?;
        }
        Ok(offset)
    }

    /// Resolves the memory at the end of one path.
    pub fn resolve(&self, path: &PathResult) -> Result<ResolvedRegion, ResolutionError> {
        let terminal = path.terminal();
        let memory = self.graph.memory_of(terminal).ok_or_else(|| {
            ResolutionError::NoTerminalMemory(
                self.graph
                    .interface(terminal)
                    .map(|i| i.name().to_string())
                    .unwrap_or_else(|| terminal.to_string()),
            )
        })?;

        let offset = self.offset(path)?;
        resolve_item(memory, offset)
    }

    /// Resolves every path, dropping and reporting the ones that fail.
    pub fn resolve_all(&self, paths: &[PathResult]) -> ResolutionOutcome {
        let mut outcome = ResolutionOutcome::default();
        for path in paths {
            match self.resolve(path) {
                Ok(region) => outcome.regions.push(region),
                Err(e) => {
                    tracing::warn!("[Resolver] {}", e);
                    outcome.diagnostics.push(e.into());
                }
            }
        }
        outcome
    }

    /// Resolves the address spaces behind initiator interfaces.
    ///
    /// Address spaces are local to their initiator and are placed at 0.
    /// A space shared by several interfaces is resolved once.
    pub fn resolve_address_spaces(&self) -> ResolutionOutcome {
        let mut outcome = ResolutionOutcome::default();
        let mut seen = HashSet::new();

        for (_, interface) in self.graph.interfaces() {
            if !interface.mode().is_initiator() {
                continue;
            }
            let Some(memory_id) = interface.memory() else {
                continue;
            };
            let Some(memory) = self.graph.memory(memory_id) else {
                continue;
            };
            if memory.kind != MemoryItemKind::AddressSpace || !seen.insert(memory_id) {
                continue;
            }

            match resolve_item(memory, 0) {
                Ok(region) => outcome.regions.push(region),
                Err(e) => outcome.diagnostics.push(e.into()),
            }
        }
        outcome
    }

    fn interface(&self, id: InterfaceId) -> Result<&'a ConnectivityInterface, ResolutionError> {
        self.graph
            .interface(id)
            .ok_or_else(|| ResolutionError::NoTerminalMemory(id.to_string()))
    }

    fn evaluate(&self, context: &str, expression: &str) -> Result<u64, ResolutionError> {
        let value = self.evaluator.evaluate(expression).map_err(|source| {
            ResolutionError::UnresolvedExpression {
                context: context.to_string(),
                expression: expression.to_string(),
                source,
            }
        })?;

        if value < 0 {
            return Err(ResolutionError::NegativeValue {
                context: context.to_string(),
                value,
            });
        }
        u64::try_from(value).map_err(|_| ResolutionError::AddressOverflow {
            context: context.to_string(),
        })
    }
}

/// Places `item` and its descendants relative to `container_base`.
pub fn resolve_item(item: &MemoryItem, container_base: u64) -> Result<ResolvedRegion, ResolutionError> {
    let address = container_base
        .checked_add(item.address)
        .ok_or_else(|| ResolutionError::AddressOverflow {
            context: item.identifier.clone(),
        })?;

    let (size, offset) = match item.kind {
        MemoryItemKind::Register { size, .. } => (size, 0),
        MemoryItemKind::Field { offset_bits } => (0, offset_bits),
        MemoryItemKind::Segment { offset } => (0, offset),
        _ => (0, 0),
    };

    let children = item
        .children
        .iter()
        .map(|child| resolve_item(child, address))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResolvedRegion {
        identifier: item.identifier.clone(),
        kind: item.kind,
        address,
        range: item.range,
        width: item.width,
        size,
        offset,
        children,
    })
}
