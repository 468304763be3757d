use super::{Node, NodeId, WorkflowGraph};
use ahash::AHashMap;
use std::collections::BTreeMap;
use tracing::debug;

/// Splits a graph into its weakly-connected components.
///
/// Edge direction is ignored; a node without edges forms its own component.
/// Components are returned in ascending order of their smallest node
/// identifier, and each keeps the edges between its nodes in their original
/// order. An empty graph yields no components at all.
pub fn isolate(graph: &WorkflowGraph) -> Vec<WorkflowGraph> {
    let ids: Vec<&NodeId> = graph.nodes.keys().collect();
    let index_of: AHashMap<&NodeId, usize> =
        ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut sets = DisjointSet::new(ids.len());
    for edge in &graph.edges {
        sets.union(index_of[&edge.source], index_of[&edge.target]);
    }

    // Node ids are visited in ascending order, so numbering components by first
    // sighting of their root orders them by smallest member.
    let mut component_of_root: AHashMap<usize, usize> = AHashMap::new();
    let mut members: Vec<BTreeMap<NodeId, Node>> = Vec::new();
    let mut component_of_node: AHashMap<&NodeId, usize> = AHashMap::new();
    for (i, id) in ids.iter().enumerate() {
        let root = sets.find(i);
        let component = *component_of_root.entry(root).or_insert_with(|| {
            members.push(BTreeMap::new());
            members.len() - 1
        });
        component_of_node.insert(*id, component);
        members[component].insert((*id).clone(), graph.nodes[*id].clone());
    }

    let mut edges = vec![Vec::new(); members.len()];
    for edge in &graph.edges {
        edges[component_of_node[&edge.source]].push(edge.clone());
    }

    let components: Vec<WorkflowGraph> = members
        .into_iter()
        .zip(edges)
        .enumerate()
        .map(|(i, (nodes, edges))| {
            WorkflowGraph::from_parts(component_id(&graph.id, i), nodes, edges)
        })
        .collect();

    debug!(
        workflow = %graph.id,
        components = components.len(),
        "isolated connected components"
    );
    components
}

/// Identifier of the `index`-th component of a workflow (`wf__g01`, `wf__g02`, ...).
fn component_id(workflow_id: &str, index: usize) -> String {
    format!("{}__g{:02}", workflow_id, index + 1)
}

/// Union-find over node indices with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
    }
}
