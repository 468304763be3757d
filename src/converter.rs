use crate::codegen::{AssemblyResult, BlockAssembler, CodeGenerator, Registry, RegistryBuilder};
use crate::error::{CyclicGraphError, ParseError};
use crate::graph::{GraphBuilder, WorkflowGraph, isolate};
use crate::workflow::IntoWorkflow;
use std::sync::Arc;
use tracing::{info, warn};

/// The conversion of one component of a workflow.
#[derive(Debug, Clone)]
pub struct ComponentConversion {
    pub graph: WorkflowGraph,
    /// The assembled blocks, or the cycle that prevented ordering.
    pub outcome: Result<AssemblyResult, CyclicGraphError>,
}

/// The conversion of a whole workflow: its graph and one entry per component.
///
/// Components succeed or fail independently, so a cyclic component sits next
/// to fully assembled ones.
#[derive(Debug, Clone)]
pub struct WorkflowConversion {
    pub graph: WorkflowGraph,
    pub components: Vec<ComponentConversion>,
}

impl WorkflowConversion {
    pub fn succeeded(&self) -> impl Iterator<Item = (&WorkflowGraph, &AssemblyResult)> {
        self.components
            .iter()
            .filter_map(|c| c.outcome.as_ref().ok().map(|r| (&c.graph, r)))
    }

    pub fn failed(&self) -> impl Iterator<Item = &CyclicGraphError> {
        self.components.iter().filter_map(|c| c.outcome.as_ref().err())
    }

    /// True when every component was assembled.
    pub fn is_complete(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Drives a workflow through graph building, component isolation and block
/// assembly.
#[derive(Clone)]
pub struct Converter {
    registry: Arc<Registry>,
}

pub struct ConverterBuilder {
    registry: RegistryBuilder,
}

impl ConverterBuilder {
    pub fn new() -> Self {
        Self {
            registry: RegistryBuilder::new(),
        }
    }

    pub fn with_type_mapping(mut self, user_type: &str, known_type: &str) -> Self {
        self.registry = self.registry.with_type_mapping(user_type, known_type);
        self
    }

    pub fn with_custom_generator(mut self, generator: Box<dyn CodeGenerator>) -> Self {
        self.registry = self.registry.with_custom_generator(generator);
        self
    }

    pub fn build(self) -> Converter {
        Converter::new(Arc::new(self.registry.build()))
    }
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::new()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Converts a workflow into per-component block sequences.
    ///
    /// A malformed workflow is fatal and returns `ParseError`. A cyclic
    /// component is recorded in its `ComponentConversion` and does not stop
    /// the remaining components.
    pub fn convert(&self, workflow: impl IntoWorkflow) -> Result<WorkflowConversion, ParseError> {
        let graph = GraphBuilder::build(workflow)?;
        let assembler = BlockAssembler::new(&self.registry);

        let components: Vec<ComponentConversion> = isolate(&graph)
            .into_iter()
            .map(|component| {
                let outcome = assembler.assemble(&component);
                if let Err(e) = &outcome {
                    warn!(component = component.id(), error = %e, "skipping cyclic component");
                }
                ComponentConversion {
                    graph: component,
                    outcome,
                }
            })
            .collect();

        info!(
            workflow = graph.id(),
            components = components.len(),
            "converted workflow"
        );
        Ok(WorkflowConversion { graph, components })
    }

    /// Assembles a single, already isolated component.
    pub fn assemble(&self, component: &WorkflowGraph) -> Result<AssemblyResult, CyclicGraphError> {
        BlockAssembler::new(&self.registry).assemble(component)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Registry::global())
    }
}
