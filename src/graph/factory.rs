//! Connectivity Graph Factory.
//!
//! This module flattens a hierarchical design into one [`ConnectivityGraph`].
//! It handles the wiring of the graph: an interface per bus interface of
//! every instance, memory trees for the maps and spaces those interfaces
//! reference, and connections for interconnections, channels, bridges and
//! hierarchical pass-throughs.
//!
//! Hierarchy is walked with an explicit worklist instead of recursion. Every
//! entry carries the designs already being expanded on its branch, so a
//! design that contains itself is reported as `CyclicHierarchy` and the
//! branch is cut. No failure aborts the build; the partial graph is always
//! returned together with the diagnostics.

use super::{ConnectivityGraph, ConnectivityInterface};
use crate::common::{ConnectionKind, Diagnostic, ExpressionEvaluator};
use crate::design::{Component, Design, Endpoint, Library};
use crate::memory::{MemoryBuilder, MemoryId};
use std::collections::{HashMap, VecDeque};

/// Address unit bits used for memory maps that do not declare any.
pub const DEFAULT_AUB: u64 = 8;

/// A graph together with everything that went wrong while building it.
#[derive(Debug, Default)]
pub struct FactoryOutput {
    pub graph: ConnectivityGraph,
    pub diagnostics: Vec<Diagnostic>,
}

/// One pending design level.
struct Expansion<'a> {
    /// Path prepended to the names of the design's instances.
    prefix: String,
    /// Instance path of the component implemented by the design.
    owner: String,
    design: &'a Design,
    /// Designs being expanded on this branch, outermost first.
    ancestry: Vec<&'a str>,
}

/// Builds connectivity graphs from a design library.
pub struct ConnectivityGraphFactory<'a, E: ?Sized> {
    library: &'a Library,
    evaluator: &'a E,
    default_aub: u64,
}

impl<'a, E> ConnectivityGraphFactory<'a, E>
where
    E: ExpressionEvaluator + ?Sized,
{
    /// Creates a factory over a library.
    ///
    /// # Arguments
    ///
    /// * `library` - Components and designs to resolve references against
    /// * `evaluator` - Evaluator for memory expressions
    pub fn new(library: &'a Library, evaluator: &'a E) -> Self {
        Self {
            library,
            evaluator,
            default_aub: DEFAULT_AUB,
        }
    }

    /// Overrides the address unit bits used for undeclared memory maps.
    pub fn with_default_aub(mut self, aub: u64) -> Self {
        self.default_aub = aub;
        self
    }

    /// Flattens the design of the component `top` into a graph.
    ///
    /// Instances of the top design are named after themselves, nested
    /// instances after their full instance path (`parent.child`). The top
    /// component's own interfaces are named `top.bus`. A top component
    /// without a design is treated as a single leaf instance named `top`.
    ///
    /// # Returns
    ///
    /// The (possibly partial) graph and the ordered diagnostics.
    pub fn build(&self, top: &str) -> FactoryOutput {
        let mut output = FactoryOutput::default();
        let mut memory = MemoryBuilder::new(self.evaluator, self.default_aub);

        let Some(component) = self.library.component(top) else {
            report(
                &mut output.diagnostics,
                Diagnostic::UnresolvedComponent {
                    instance: top.to_string(),
                    component: top.to_string(),
                },
            );
            return output;
        };

        let mut worklist = VecDeque::new();
        self.emit_instance(&mut output, &mut memory, &component.name, component);
        if let Some(expansion) = self.expand(&mut output, component, &component.name, "", &[]) {
            worklist.push_back(expansion);
        }

        while let Some(expansion) = worklist.pop_front() {
            for instance in &expansion.design.instances {
                let path = qualify(&expansion.prefix, &instance.name);
                let Some(component) = self.library.component(&instance.component) else {
                    report(
                        &mut output.diagnostics,
                        Diagnostic::UnresolvedComponent {
                            instance: path,
                            component: instance.component.clone(),
                        },
                    );
                    continue;
                };

                self.emit_instance(&mut output, &mut memory, &path, component);
                if let Some(child) =
                    self.expand(&mut output, component, &path, &path, &expansion.ancestry)
                {
                    worklist.push_back(child);
                }
            }

            self.connect_design(&mut output, &expansion);
        }

        tracing::info!(
            "[Factory] Built graph for {}: {} interfaces, {} connections, {} diagnostics",
            top,
            output.graph.interface_count(),
            output.graph.connection_count(),
            output.diagnostics.len()
        );
        output
    }

    /// Resolves the design of a hierarchical component into a worklist entry.
    fn expand(
        &self,
        output: &mut FactoryOutput,
        component: &'a Component,
        owner: &str,
        prefix: &str,
        ancestry: &[&'a str],
    ) -> Option<Expansion<'a>> {
        let design_name = component.design.as_deref()?;
        let Some(design) = self.library.design(design_name) else {
            report(
                &mut output.diagnostics,
                Diagnostic::UnresolvedDesign {
                    component: component.name.clone(),
                    design: design_name.to_string(),
                },
            );
            return None;
        };

        if ancestry.contains(&design.name.as_str()) {
            report(
                &mut output.diagnostics,
                Diagnostic::CyclicHierarchy {
                    design: design.name.clone(),
                    instance: owner.to_string(),
                },
            );
            return None;
        }

        let mut ancestry = ancestry.to_vec();
        ancestry.push(design.name.as_str());
        Some(Expansion {
            prefix: prefix.to_string(),
            owner: owner.to_string(),
            design,
            ancestry,
        })
    }

    /// Adds the interfaces, bridges and channels of one instance.
    fn emit_instance(
        &self,
        output: &mut FactoryOutput,
        memory: &mut MemoryBuilder<'_, E>,
        path: &str,
        component: &Component,
    ) {
        let mut maps: HashMap<&str, Option<MemoryId>> = HashMap::new();
        let mut spaces: HashMap<&str, Option<MemoryId>> = HashMap::new();

        for bus in &component.bus_interfaces {
            let mut interface = ConnectivityInterface::new(path, &bus.name, bus.mode);

            if let Some(map_name) = bus.memory_map.as_deref() {
                match component.memory_map(map_name) {
                    Some(map) => {
                        let id = *maps.entry(map_name).or_insert_with(|| {
                            memory
                                .build_memory_map(path, map)
                                .map(|item| output.graph.add_memory(item))
                        });
                        if let Some(id) = id {
                            interface = interface.with_memory(id);
                        }
                    }
                    None => report(
                        &mut output.diagnostics,
                        Diagnostic::UnresolvedMemory {
                            interface: interface.name().to_string(),
                            memory: map_name.to_string(),
                        },
                    ),
                }
            } else if let Some(space_name) = bus.address_space.as_deref() {
                match component.address_space(space_name) {
                    Some(space) => {
                        let id = *spaces.entry(space_name).or_insert_with(|| {
                            memory
                                .build_address_space(path, space)
                                .map(|item| output.graph.add_memory(item))
                        });
                        if let Some(id) = id {
                            interface = interface.with_memory(id);
                        }
                    }
                    None => report(
                        &mut output.diagnostics,
                        Diagnostic::UnresolvedMemory {
                            interface: interface.name().to_string(),
                            memory: space_name.to_string(),
                        },
                    ),
                }
            }

            if let Some(base) = &bus.base_address {
                interface = interface.with_base_address(base.clone());
            }
            if let Some(remap) = &bus.remap_address {
                interface = interface.with_remap(remap.clone(), bus.remap_range.clone());
            }
            if component.is_hierarchical() {
                interface = interface.hierarchical();
            }

            if let Err(e) = output.graph.add_interface(interface) {
                report(&mut output.diagnostics, e.into());
            }
        }

        for diagnostic in memory.take_diagnostics() {
            output.diagnostics.push(diagnostic);
        }

        for bus in &component.bus_interfaces {
            for initiator in &bus.bridges {
                let name = format!("{}.{}->{}", path, bus.name, initiator);
                let result = output.graph.add_connection(
                    name,
                    ConnectionKind::Bridge,
                    &qualify(path, &bus.name),
                    &qualify(path, initiator),
                );
                if let Err(e) = result {
                    report(&mut output.diagnostics, e.into());
                }
            }
        }

        // Channel members of the same mode are not joined: a mirrored target
        // only carries transactions arriving from a mirrored initiator.
        let mode_of = |bus: &str| component.bus_interface(bus).map(|b| b.mode);
        for channel in &component.channels {
            let name = qualify(path, &channel.name);
            for (i, first) in channel.interfaces.iter().enumerate() {
                for second in &channel.interfaces[i + 1..] {
                    if let (Some(a), Some(b)) = (mode_of(first), mode_of(second)) {
                        if a == b {
                            continue;
                        }
                    }
                    let result = output.graph.add_connection(
                        name.clone(),
                        ConnectionKind::Channel,
                        &qualify(path, first),
                        &qualify(path, second),
                    );
                    if let Err(e) = result {
                        report(&mut output.diagnostics, e.into());
                    }
                }
            }
        }
    }

    /// Adds the interconnections of one design level.
    ///
    /// The first endpoint of each interconnection is joined to every other
    /// endpoint. A connection touching a hierarchical endpoint is a
    /// pass-through to the owning instance.
    fn connect_design(&self, output: &mut FactoryOutput, expansion: &Expansion<'_>) {
        for (n, interconnection) in expansion.design.interconnections.iter().enumerate() {
            let name = if interconnection.name.is_empty() {
                format!("{}#{}", expansion.design.name, n)
            } else {
                interconnection.name.clone()
            };
            let name = qualify(&expansion.prefix, &name);

            let Some((start, rest)) = interconnection.endpoints.split_first() else {
                continue;
            };
            let start_name = self.endpoint_name(expansion, start);

            for other in rest {
                let kind = if start.is_hierarchical() || other.is_hierarchical() {
                    ConnectionKind::Hierarchical
                } else {
                    ConnectionKind::Interconnection
                };
                let result = output.graph.add_connection(
                    name.clone(),
                    kind,
                    &start_name,
                    &self.endpoint_name(expansion, other),
                );
                if let Err(e) = result {
                    report(&mut output.diagnostics, e.into());
                }
            }
        }
    }

    fn endpoint_name(&self, expansion: &Expansion<'_>, endpoint: &Endpoint) -> String {
        match &endpoint.instance {
            Some(instance) => qualify(&qualify(&expansion.prefix, instance), &endpoint.bus),
            None => qualify(&expansion.owner, &endpoint.bus),
        }
    }
}

fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    tracing::warn!("[Factory] {}", diagnostic);
    diagnostics.push(diagnostic);
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
