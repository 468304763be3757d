use super::{BlockState, CodeBlock, NodeCodeResolver, NodeContext, Registry};
use crate::error::CyclicGraphError;
use crate::graph::{WorkflowGraph, order};
use itertools::Itertools;
use serde::Serialize;
use tracing::info;

/// Block counts reported for one assembled component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssemblySummary {
    pub total: usize,
    pub ok: usize,
    pub idle: usize,
    pub errors: usize,
}

/// The ordered code for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyResult {
    /// One block per node, in topological order.
    pub blocks: Vec<CodeBlock>,
    /// Every import the blocks need, deduplicated in first-use order.
    pub imports: Vec<String>,
    pub summary: AssemblySummary,
}

/// Orders a component and resolves each of its nodes into a block.
pub struct BlockAssembler<'r> {
    resolver: NodeCodeResolver<'r>,
}

impl<'r> BlockAssembler<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            resolver: NodeCodeResolver::new(registry),
        }
    }

    /// Assembles the block sequence of a component.
    ///
    /// The result depends only on the component and the registry, so
    /// assembling the same component twice yields identical output.
    pub fn assemble(&self, component: &WorkflowGraph) -> Result<AssemblyResult, CyclicGraphError> {
        let node_order = order(component)?;

        let blocks: Vec<CodeBlock> = node_order
            .iter()
            .filter_map(|id| component.nodes().get(id))
            .map(|node| self.resolver.resolve(&NodeContext::new(component, node)))
            .collect();

        let imports: Vec<String> = blocks
            .iter()
            .flat_map(|b| b.imports.iter())
            .unique()
            .cloned()
            .collect();

        let count = |state| blocks.iter().filter(|b| b.state == state).count();
        let summary = AssemblySummary {
            total: blocks.len(),
            ok: count(BlockState::Ok),
            idle: count(BlockState::Idle),
            errors: count(BlockState::Error),
        };

        info!(
            component = component.id(),
            nodes = summary.total,
            idle = summary.idle,
            errors = summary.errors,
            "assembled component"
        );
        Ok(AssemblyResult {
            blocks,
            imports,
            summary,
        })
    }
}
