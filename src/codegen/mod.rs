//! Per-node code generation and per-component block assembly.

use crate::error::GenerateError;
use crate::graph::{Node, NodeId, WorkflowGraph, natural_cmp};
use serde::Serialize;
use std::fmt;

mod assembler;
mod generators;
mod registry;
mod resolver;

pub use assembler::{AssemblyResult, AssemblySummary, BlockAssembler};
pub use generators::node_types;
pub use registry::{Registry, RegistryBuilder};
pub use resolver::NodeCodeResolver;

/// Defines the contract for turning one node type into source code.
///
/// Implementations must be stateless: the same context always yields the
/// same code, and a registry may share one instance across threads.
pub trait CodeGenerator: Send + Sync {
    /// The type identifier this generator is registered under by default.
    fn node_type(&self) -> &str;
    fn generate(&self, ctx: &NodeContext<'_>) -> Result<GeneratedCode, GenerateError>;
}

/// The output of a successful `CodeGenerator::generate` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedCode {
    pub source: String,
    /// Import statements the source relies on, in first-use order.
    pub imports: Vec<String>,
}

/// Outcome of resolving a node into a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockState {
    /// A generator produced code for the node.
    Ok,
    /// No generator is registered for the node's type.
    Idle,
    /// A generator exists but rejected the node.
    Error,
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BlockState::Ok => "OK",
            BlockState::Idle => "IDLE",
            BlockState::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// One unit of generated source, owned by exactly one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub node_id: NodeId,
    pub title: String,
    pub node_type: String,
    pub source: String,
    pub state: BlockState,
    pub not_implemented: bool,
    pub imports: Vec<String>,
}

/// An input port of a node and the upstream output feeding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortBinding<'a> {
    pub target_port: &'a str,
    pub source: &'a NodeId,
    pub source_port: &'a str,
}

/// Everything a generator may look at when producing code for one node.
///
/// Generated code passes tables between nodes through a `context` dictionary
/// keyed by `"<node id>:<port>"`.
#[derive(Debug, Clone)]
pub struct NodeContext<'a> {
    pub node: &'a Node,
    /// Incoming bindings, sorted by target port.
    pub inputs: Vec<PortBinding<'a>>,
    /// Distinct outgoing source ports, sorted.
    pub output_ports: Vec<&'a str>,
}

impl<'a> NodeContext<'a> {
    pub fn new(graph: &'a WorkflowGraph, node: &'a Node) -> Self {
        let mut inputs: Vec<PortBinding<'a>> = graph
            .incoming(&node.id)
            .map(|e| PortBinding {
                target_port: &e.target_port,
                source: &e.source,
                source_port: &e.source_port,
            })
            .collect();
        inputs.sort_by(|a, b| natural_cmp(a.target_port, b.target_port));

        let mut output_ports: Vec<&'a str> =
            graph.outgoing(&node.id).map(|e| e.source_port.as_str()).collect();
        output_ports.sort_by(|a, b| natural_cmp(a, b));
        output_ports.dedup();

        Self {
            node,
            inputs,
            output_ports,
        }
    }

    /// The `context` key of the table feeding the `index`-th input.
    pub fn input_key(&self, index: usize) -> Result<String, GenerateError> {
        self.inputs
            .get(index)
            .map(|b| format!("{}:{}", b.source, b.source_port))
            .ok_or(GenerateError::MissingInput { index })
    }

    /// The `context` keys this node publishes its result under.
    ///
    /// A node without downstream consumers still publishes on port `1`.
    pub fn output_keys(&self) -> Vec<String> {
        if self.output_ports.is_empty() {
            return vec![format!("{}:1", self.node.id)];
        }
        self.output_ports
            .iter()
            .map(|port| format!("{}:{}", self.node.id, port))
            .collect()
    }

    pub fn config(&self, key: &str) -> Option<&'a serde_json::Value> {
        self.node.config.get(key)
    }

    pub fn config_str(&self, key: &str) -> Result<&'a str, GenerateError> {
        match self.config(key) {
            None => Err(GenerateError::MissingConfig(key.to_string())),
            Some(value) => value.as_str().ok_or_else(|| invalid(key, "a string")),
        }
    }

    pub fn config_str_or(&self, key: &str, default: &'a str) -> Result<&'a str, GenerateError> {
        match self.config(key) {
            None => Ok(default),
            Some(_) => self.config_str(key),
        }
    }

    pub fn config_bool_or(&self, key: &str, default: bool) -> Result<bool, GenerateError> {
        match self.config(key) {
            None => Ok(default),
            Some(value) => value.as_bool().ok_or_else(|| invalid(key, "a boolean")),
        }
    }

    /// A required, non-empty list of strings.
    pub fn config_str_list(&self, key: &str) -> Result<Vec<&'a str>, GenerateError> {
        let items = self
            .config(key)
            .ok_or_else(|| GenerateError::MissingConfig(key.to_string()))?
            .as_array()
            .filter(|items| !items.is_empty())
            .ok_or_else(|| invalid(key, "a non-empty list of strings"))?;
        items
            .iter()
            .map(|item| item.as_str().ok_or_else(|| invalid(key, "a non-empty list of strings")))
            .collect()
    }

    /// A required, non-empty object whose values are all strings.
    pub fn config_str_map(&self, key: &str) -> Result<Vec<(&'a str, &'a str)>, GenerateError> {
        let entries = self
            .config(key)
            .ok_or_else(|| GenerateError::MissingConfig(key.to_string()))?
            .as_object()
            .filter(|entries| !entries.is_empty())
            .ok_or_else(|| invalid(key, "a non-empty object of strings"))?;
        entries
            .iter()
            .map(|(k, v)| {
                v.as_str()
                    .map(|v| (k.as_str(), v))
                    .ok_or_else(|| invalid(key, "a non-empty object of strings"))
            })
            .collect()
    }
}

fn invalid(key: &str, expected: &'static str) -> GenerateError {
    GenerateError::InvalidConfig {
        key: key.to_string(),
        expected,
    }
}
