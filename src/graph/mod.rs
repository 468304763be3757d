//! The typed workflow graph and the structural passes over it.
//!
//! Graphs are plain owned containers addressed by `NodeId`: nodes live in an
//! ordered map and edges in a vector, so every traversal is deterministic and
//! independent of insertion order or aliasing.

use crate::workflow::NodeConfig;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

mod builder;
mod isolate;
mod order;

pub use builder::GraphBuilder;
pub use isolate::isolate;
pub use order::order;

/// A node identifier, unique within its graph.
///
/// Identifiers are ordered naturally: purely numeric identifiers compare by
/// value (so `"2"` sorts before `"10"`) and precede all other identifiers,
/// which compare lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for NodeId {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_cmp(&self.0, &other.0)
    }
}

impl PartialOrd for NodeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Compares identifiers (or port names) numerically when both are unsigned
/// integers, placing numbers before text.
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let by_kind = match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => Ordering::Equal,
    };
    // Falling back to the raw text keeps the order consistent with `Eq`
    // ("7" and "007" are distinct identifiers).
    by_kind.then_with(|| a.cmp(b))
}

/// One computational step of a workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub title: String,
    /// Opaque name of the computation, used as the code generator key.
    pub node_type: String,
    pub config: NodeConfig,
}

/// A directed data dependency: `source`'s output port feeds `target`'s input port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub source_port: String,
    pub target: NodeId,
    pub target_port: String,
}

/// An immutable, validated workflow graph.
///
/// Only `GraphBuilder` and `isolate` construct graphs, which guarantees that
/// node identifiers are unique and that every edge references existing nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowGraph {
    id: String,
    nodes: BTreeMap<NodeId, Node>,
    edges: Vec<Edge>,
}

impl WorkflowGraph {
    pub(crate) fn from_parts(id: String, nodes: BTreeMap<NodeId, Node>, edges: Vec<Edge>) -> Self {
        Self { id, nodes, edges }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// All nodes, in ascending identifier order.
    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(&NodeId::new(id))
    }

    /// All edges, in their original declaration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges feeding into `id`, in declaration order.
    pub fn incoming<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.target == id)
    }

    /// Edges leaving `id`, in declaration order.
    pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.source == id)
    }
}
