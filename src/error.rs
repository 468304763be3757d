use crate::graph::NodeId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning raw workflow records into a `WorkflowGraph`.
///
/// Any of these aborts the conversion of the whole workflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Failed to parse workflow JSON: {0}")]
    Json(String),

    #[error("Could not read workflow '{}': {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("Node identifier '{0}' appears more than once in the workflow")]
    DuplicateNode(NodeId),

    #[error(
        "Connection #{connection_index} references {endpoint} node '{missing_node_id}', which is not part of the workflow"
    )]
    DanglingEdge {
        connection_index: usize,
        endpoint: &'static str,
        missing_node_id: NodeId,
    },

    #[error("{record} is missing the required field '{field}'")]
    MissingField { record: String, field: &'static str },
}

/// A component whose dependency edges form a cycle and therefore has no
/// topological order.
///
/// Only the offending component is lost; other components of the same
/// workflow are unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Component '{graph_id}' contains a dependency cycle through nodes [{}]",
    join_ids(.remaining)
)]
pub struct CyclicGraphError {
    pub graph_id: String,
    /// Nodes that could not be ordered, in ascending identifier order.
    pub remaining: Vec<NodeId>,
}

fn join_ids(ids: &[NodeId]) -> String {
    ids.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors a code generator can report for a single node.
///
/// These never escape the resolver: they become `ERROR` blocks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Required configuration key '{0}' is missing")]
    MissingConfig(String),

    #[error("Configuration key '{key}' must be {expected}")]
    InvalidConfig { key: String, expected: &'static str },

    #[error("Input port #{index} is not connected")]
    MissingInput { index: usize },
}

/// Errors that can occur while writing graph files or workbooks.
#[derive(Error, Debug, Clone)]
pub enum ExportError {
    #[error("I/O error on '{}': {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("Serialization failed: {0}")]
    Serialize(String),
}

/// Errors that can occur while locating workflow documents on disk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("Path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a workflow file: {}", .0.display())]
    NotAWorkflowFile(PathBuf),

    #[error("No workflow file found in directory: {}", .0.display())]
    NoWorkflowInDirectory(PathBuf),

    #[error("Could not read '{}': {message}", .path.display())]
    Unreadable { path: PathBuf, message: String },
}

/// Errors that stop the conversion of a root workflow and its sub-workflows.
///
/// Failures in sub-workflows are logged and skipped; only the root workflow
/// produces these.
#[derive(Error, Debug, Clone)]
pub enum BatchError {
    #[error(transparent)]
    InvalidPath(#[from] DiscoveryError),

    #[error("ERROR parsing {}: {source}", .path.display())]
    Parse { path: PathBuf, source: ParseError },

    #[error("No nodes found in workflow: {}", .0.display())]
    EmptyWorkflow(PathBuf),

    #[error("ERROR exporting {}: {source}", .path.display())]
    Export { path: PathBuf, source: ExportError },
}

impl BatchError {
    /// The process exit status a command-line front end reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            BatchError::InvalidPath(_) => 2,
            BatchError::Parse { .. } => 3,
            BatchError::EmptyWorkflow(_) => 4,
            BatchError::Export { .. } => 5,
        }
    }
}
