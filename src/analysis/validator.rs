//! Memory Region Validation.
//!
//! This module checks that the sibling regions of one memory container tile
//! its address space consistently. Checks run in a fixed order and every
//! finding is reported:
//!
//! 1. `InvalidName` for empty or whitespace-only names,
//! 2. `DuplicateName` for every repeated name,
//! 3. `InvalidBaseAddress` / `InvalidRange` for bounds that do not evaluate
//!    to a usable value; such regions take no further part in placement,
//! 4. `OverlappingRegions` for every pair of placed regions sharing an
//!    address,
//! 5. `InvalidWidth` for widths that do not evaluate, `MisalignedWidth` for
//!    widths that are not a multiple of the container AUB,
//! 6. `InvalidPresence` for presence expressions not evaluating to 0 or 1,
//! 7. `NotContained` for regions running past a known container range.
//!
//! Regions whose presence evaluates to 0 are not placed.

use super::region::{overlaps, AddressRegion, Region, Span};
use crate::common::{EvaluationFailure, ExpressionEvaluator, Value};
use crate::design::{AddressBlock, AddressSpace, Component, Library, MemoryMap, Register};
use std::collections::HashSet;
use std::ops::ControlFlow;
use thiserror::Error;

/// One finding of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationDiagnostic {
    #[error("{container}: region {index} has an invalid name '{name}'")]
    InvalidName {
        container: String,
        index: usize,
        name: String,
    },

    #[error("{container}: name {name} is used by more than one region")]
    DuplicateName { container: String, name: String },

    #[error("{container}: base address `{expression}` of {name} {reason}")]
    InvalidBaseAddress {
        container: String,
        name: String,
        expression: String,
        reason: String,
    },

    #[error("{container}: range `{expression}` of {name} {reason}")]
    InvalidRange {
        container: String,
        name: String,
        expression: String,
        reason: String,
    },

    #[error("{container}: {first} {first_span} overlaps {second} {second_span}")]
    OverlappingRegions {
        container: String,
        first: String,
        first_span: Span,
        second: String,
        second_span: Span,
    },

    #[error("{container}: width `{expression}` of {name} {reason}")]
    InvalidWidth {
        container: String,
        name: String,
        expression: String,
        reason: String,
    },

    #[error("{container}: width {width} of {name} is not a multiple of {aub} address unit bits")]
    MisalignedWidth {
        container: String,
        name: String,
        width: u64,
        aub: u64,
    },

    #[error("{container}: presence `{expression}` of {name} {reason}")]
    InvalidPresence {
        container: String,
        name: String,
        expression: String,
        reason: String,
    },

    #[error("{container}: {name} ends at {end:#x}, past the container range of {container_range:#x}")]
    NotContained {
        container: String,
        name: String,
        end: u64,
        container_range: u64,
    },
}

/// Verdict and findings of one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub container: String,
    /// `true` iff `diagnostics` is empty.
    pub valid: bool,
    pub diagnostics: Vec<ValidationDiagnostic>,
}

/// Forwards a diagnostic to the sink and stops the pass if it asks to.
macro_rules! emit {
    ($sink:expr, $diagnostic:expr) => {
        if $sink($diagnostic).is_break() {
            return ControlFlow::Break(());
        }
    };
}

/// Checks the sibling regions of one container.
pub struct MemoryRegionValidator<'a, E: ?Sized> {
    evaluator: &'a E,
    container: String,
    aub: Option<u64>,
    container_range: Option<u64>,
}

impl<'a, E> MemoryRegionValidator<'a, E>
where
    E: ExpressionEvaluator + ?Sized,
{
    /// Creates a validator with no AUB and no container range.
    ///
    /// # Arguments
    ///
    /// * `container` - Name used as context in every diagnostic
    /// * `evaluator` - Evaluator for region expressions
    pub fn new(container: impl Into<String>, evaluator: &'a E) -> Self {
        Self {
            evaluator,
            container: container.into(),
            aub: None,
            container_range: None,
        }
    }

    /// Enables the width alignment check. An AUB of 0 disables it.
    pub fn with_aub(mut self, aub: u64) -> Self {
        self.aub = Some(aub);
        self
    }

    /// Enables the containment check.
    pub fn with_container_range(mut self, range: u64) -> Self {
        self.container_range = Some(range);
        self
    }

    /// Runs every check and collects every finding.
    pub fn validate<R: AddressRegion>(&self, regions: &[R]) -> ValidationReport {
        let mut diagnostics = Vec::new();
        let _ = self.check(regions, &mut |diagnostic| {
            diagnostics.push(diagnostic);
            ControlFlow::Continue(())
        });

        tracing::debug!(
            "[Validator] {}: {} regions, {} findings",
            self.container,
            regions.len(),
            diagnostics.len()
        );
        ValidationReport {
            container: self.container.clone(),
            valid: diagnostics.is_empty(),
            diagnostics,
        }
    }

    /// Runs the checks until the first finding.
    ///
    /// Agrees with `validate(regions).valid`.
    pub fn is_valid<R: AddressRegion>(&self, regions: &[R]) -> bool {
        self.check(regions, &mut |_| ControlFlow::Break(()))
            .is_continue()
    }

    fn check<R: AddressRegion>(
        &self,
        regions: &[R],
        sink: &mut dyn FnMut(ValidationDiagnostic) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let container = &self.container;

        for (index, region) in regions.iter().enumerate() {
            if region.name().trim().is_empty() {
                emit!(
                    sink,
                    ValidationDiagnostic::InvalidName {
                        container: container.clone(),
                        index,
                        name: region.name().to_string(),
                    }
                );
            }
        }

        let mut names = HashSet::new();
        for region in regions {
            let name = region.name();
            if !name.trim().is_empty() && !names.insert(name) {
                emit!(
                    sink,
                    ValidationDiagnostic::DuplicateName {
                        container: container.clone(),
                        name: name.to_string(),
                    }
                );
            }
        }

        let mut placed: Vec<(&str, Span)> = Vec::new();
        for region in regions {
            if matches!(self.presence(region), Some(Ok(0))) {
                continue;
            }

            let base = match self.evaluate(region.base_address()) {
                Ok(base) => Some(base),
                Err(reason) => {
                    emit!(
                        sink,
                        ValidationDiagnostic::InvalidBaseAddress {
                            container: container.clone(),
                            name: region.name().to_string(),
                            expression: region.base_address().to_string(),
                            reason,
                        }
                    );
                    None
                }
            };

            let range = match region.range_failure() {
                Some(reason) => Err(reason.to_string()),
                None => match self.evaluate(region.range()) {
                    Ok(0) => Err("is empty".to_string()),
                    other => other,
                },
            };
            let range = match range {
                Ok(range) => Some(range),
                Err(reason) => {
                    emit!(
                        sink,
                        ValidationDiagnostic::InvalidRange {
                            container: container.clone(),
                            name: region.name().to_string(),
                            expression: region.range().to_string(),
                            reason,
                        }
                    );
                    None
                }
            };

            let (Some(base), Some(range)) = (base, range) else {
                continue;
            };
            match Span::from_base_and_range(base, range) {
                Some(span) => placed.push((region.name(), span)),
                None => emit!(
                    sink,
                    ValidationDiagnostic::InvalidRange {
                        container: container.clone(),
                        name: region.name().to_string(),
                        expression: region.range().to_string(),
                        reason: "runs past the end of the address space".to_string(),
                    }
                ),
            }
        }

        for (i, (first, first_span)) in placed.iter().enumerate() {
            for (second, second_span) in &placed[i + 1..] {
                if overlaps(first_span, second_span) {
                    emit!(
                        sink,
                        ValidationDiagnostic::OverlappingRegions {
                            container: container.clone(),
                            first: first.to_string(),
                            first_span: *first_span,
                            second: second.to_string(),
                            second_span: *second_span,
                        }
                    );
                }
            }
        }

        let aub = self.aub.filter(|aub| *aub > 0);
        for region in regions {
            let Some(expression) = region.width() else {
                continue;
            };
            match (self.evaluate(expression), aub) {
                (Ok(width), Some(aub)) if width % aub != 0 => emit!(
                    sink,
                    ValidationDiagnostic::MisalignedWidth {
                        container: container.clone(),
                        name: region.name().to_string(),
                        width,
                        aub,
                    }
                ),
                (Ok(_), _) => {}
                (Err(reason), _) => emit!(
                    sink,
                    ValidationDiagnostic::InvalidWidth {
                        container: container.clone(),
                        name: region.name().to_string(),
                        expression: expression.to_string(),
                        reason,
                    }
                ),
            }
        }

        for region in regions {
            let reason = match self.presence(region) {
                Some(Ok(0 | 1)) | None => continue,
                Some(Ok(value)) => format!("evaluates to {}, expected 0 or 1", value),
                Some(Err(e)) => format!("cannot be evaluated: {}", e),
            };
            emit!(
                sink,
                ValidationDiagnostic::InvalidPresence {
                    container: container.clone(),
                    name: region.name().to_string(),
                    expression: region.is_present().unwrap_or_default().to_string(),
                    reason,
                }
            );
        }

        if let Some(limit) = self.container_range {
            for (name, span) in &placed {
                if span.end >= limit {
                    emit!(
                        sink,
                        ValidationDiagnostic::NotContained {
                            container: container.clone(),
                            name: name.to_string(),
                            end: span.end,
                            container_range: limit,
                        }
                    );
                }
            }
        }

        ControlFlow::Continue(())
    }

    fn presence<R: AddressRegion>(&self, region: &R) -> Option<Result<Value, EvaluationFailure>> {
        region
            .is_present()
            .filter(|expression| !expression.trim().is_empty())
            .map(|expression| self.evaluator.evaluate(expression))
    }

    /// Evaluates to a non-negative value or explains why not.
    fn evaluate(&self, expression: &str) -> Result<u64, String> {
        match self.evaluator.evaluate(expression) {
            Ok(value) if value < 0 => Err(format!("evaluates to negative value {}", value)),
            Ok(value) => u64::try_from(value).map_err(|_| format!("evaluates to {}, beyond 64 bits", value)),
            Err(e) => Err(format!("cannot be evaluated: {}", e)),
        }
    }
}

/// Validates the address blocks of a memory map.
///
/// The map's own AUB applies, or `default_aub` when it declares none.
pub fn validate_memory_map<E>(
    container: &str,
    map: &MemoryMap,
    evaluator: &E,
    default_aub: u64,
) -> ValidationReport
where
    E: ExpressionEvaluator + ?Sized,
{
    let aub = container_aub(map.aub.as_deref(), evaluator, default_aub);
    MemoryRegionValidator::new(container, evaluator)
        .with_aub(aub)
        .validate(&map.address_blocks)
}

/// Validates the registers of an address block.
///
/// A register of `size` bits spans `ceil(size / aub)` units, times its
/// dimension for register arrays. The block range bounds the registers.
pub fn validate_address_block<E>(
    container: &str,
    block: &AddressBlock,
    aub: u64,
    evaluator: &E,
) -> ValidationReport
where
    E: ExpressionEvaluator + ?Sized,
{
    let aub = aub.max(1);
    let regions: Vec<Region> = block
        .registers
        .iter()
        .map(|register| register_region(register, aub, evaluator))
        .collect();

    let mut validator = MemoryRegionValidator::new(container, evaluator).with_aub(aub);
    if let Some(range) = evaluator
        .evaluate(&block.range)
        .ok()
        .and_then(|range| u64::try_from(range).ok())
    {
        validator = validator.with_container_range(range);
    }
    validator.validate(&regions)
}

/// Derives the placement region of a register or register array.
///
/// An unusable size is left to the range check. An unusable dimension or an
/// extent past 64 bits makes the range invalid.
fn register_region<E>(register: &Register, aub: u64, evaluator: &E) -> Region
where
    E: ExpressionEvaluator + ?Sized,
{
    let dimension = register
        .dimension
        .as_deref()
        .filter(|dimension| !dimension.trim().is_empty());
    let span = evaluator
        .evaluate(&register.size)
        .ok()
        .and_then(|size| u64::try_from(size).ok())
        .map(|size| size.div_ceil(aub));

    let mut region = match (span, dimension) {
        (None, _) => Region::new(&register.name, &register.offset, &register.size),
        (Some(span), None) => Region::new(&register.name, &register.offset, span.to_string()),
        (Some(span), Some(dimension)) => {
            let extent = format!("({}) * ({})", register.size, dimension);
            let count = match evaluator.evaluate(dimension) {
                Ok(count) if count < 0 => Err(format!("has negative dimension {}", count)),
                Ok(count) => u64::try_from(count)
                    .map(|count| count.max(1))
                    .map_err(|_| format!("has dimension {}, beyond 64 bits", count)),
                Err(e) => Err(format!("has a dimension that cannot be evaluated: {}", e)),
            };
            match count.and_then(|count| {
                span.checked_mul(count)
                    .ok_or_else(|| "spans more address units than fit in 64 bits".to_string())
            }) {
                Ok(units) => Region::new(&register.name, &register.offset, units.to_string()),
                Err(reason) => Region::new(&register.name, &register.offset, extent).with_range_failure(reason),
            }
        }
    };

    region = region.with_width(&register.size);
    match &register.is_present {
        Some(presence) => region.with_presence(presence),
        None => region,
    }
}

/// Validates the segments of an address space against its range.
pub fn validate_address_space<E>(
    container: &str,
    space: &AddressSpace,
    evaluator: &E,
    default_aub: u64,
) -> ValidationReport
where
    E: ExpressionEvaluator + ?Sized,
{
    let aub = container_aub(space.aub.as_deref(), evaluator, default_aub);
    let mut validator = MemoryRegionValidator::new(container, evaluator).with_aub(aub);
    if let Some(range) = evaluator
        .evaluate(&space.range)
        .ok()
        .and_then(|range| u64::try_from(range).ok())
    {
        validator = validator.with_container_range(range);
    }
    validator.validate(&space.segments)
}

/// Validates every memory container of a component.
///
/// Reports come in declaration order: each memory map followed by its
/// address blocks, then the address spaces.
pub fn validate_component<E>(component: &Component, evaluator: &E, default_aub: u64) -> Vec<ValidationReport>
where
    E: ExpressionEvaluator + ?Sized,
{
    let mut reports = Vec::new();

    for map in &component.memory_maps {
        let container = format!("{}.{}", component.name, map.name);
        reports.push(validate_memory_map(&container, map, evaluator, default_aub));

        let aub = container_aub(map.aub.as_deref(), evaluator, default_aub);
        for block in &map.address_blocks {
            let container = format!("{}.{}", container, block.name);
            reports.push(validate_address_block(&container, block, aub, evaluator));
        }
    }

    for space in &component.address_spaces {
        let container = format!("{}.{}", component.name, space.name);
        reports.push(validate_address_space(&container, space, evaluator, default_aub));
    }

    reports
}

/// Validates every memory container in a library.
pub fn validate_library<E>(library: &Library, evaluator: &E, default_aub: u64) -> Vec<ValidationReport>
where
    E: ExpressionEvaluator + ?Sized,
{
    let reports: Vec<ValidationReport> = library
        .components
        .iter()
        .flat_map(|component| validate_component(component, evaluator, default_aub))
        .collect();

    let failed = reports.iter().filter(|r| !r.valid).count();
    tracing::info!(
        "[Validator] Checked {} containers, {} failed",
        reports.len(),
        failed
    );
    reports
}

/// AUB of a container: its own non-zero value or the default.
fn container_aub<E>(expression: Option<&str>, evaluator: &E, default_aub: u64) -> u64
where
    E: ExpressionEvaluator + ?Sized,
{
    expression
        .filter(|e| !e.trim().is_empty())
        .and_then(|e| evaluator.evaluate(e).ok())
        .and_then(|aub| u64::try_from(aub).ok())
        .filter(|aub| *aub > 0)
        .unwrap_or(default_aub)
}
