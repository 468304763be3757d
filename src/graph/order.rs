use super::{NodeId, WorkflowGraph};
use crate::error::CyclicGraphError;
use ahash::AHashMap;
use std::collections::BTreeSet;

/// Computes a topological order of a component with Kahn's algorithm.
///
/// For every edge `u -> v` the result places `u` before `v`. Among nodes that
/// become ready at the same time the smallest identifier goes first, so the
/// order is identical across runs.
///
/// # Errors
///
/// Returns `CyclicGraphError` when the edges form a cycle; the error lists the
/// nodes that could not be ordered.
pub fn order(component: &WorkflowGraph) -> Result<Vec<NodeId>, CyclicGraphError> {
    let mut in_degree: AHashMap<&NodeId, usize> =
        component.nodes.keys().map(|id| (id, 0)).collect();
    let mut successors: AHashMap<&NodeId, Vec<&NodeId>> = AHashMap::new();
    for edge in &component.edges {
        successors.entry(&edge.source).or_default().push(&edge.target);
        if let Some(degree) = in_degree.get_mut(&edge.target) {
            *degree += 1;
        }
    }

    let mut ready: BTreeSet<&NodeId> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect();

    let mut sorted = Vec::with_capacity(component.nodes.len());
    while let Some(id) = ready.pop_first() {
        sorted.push(id.clone());
        for next in successors.get(id).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(*next);
                }
            }
        }
    }

    if sorted.len() < component.nodes.len() {
        let mut remaining: Vec<NodeId> = in_degree
            .into_iter()
            .filter(|(_, degree)| *degree > 0)
            .map(|(id, _)| id.clone())
            .collect();
        remaining.sort();
        return Err(CyclicGraphError {
            graph_id: component.id.clone(),
            remaining,
        });
    }
    Ok(sorted)
}
