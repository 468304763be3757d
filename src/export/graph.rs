use crate::error::ExportError;
use crate::graph::{Edge, NodeId, WorkflowGraph};
use crate::workflow::NodeConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Serialize)]
struct GraphDocument<'a> {
    workflow_id: &'a str,
    nodes: BTreeMap<&'a NodeId, NodeRecord<'a>>,
    edges: &'a [Edge],
}

#[derive(Serialize)]
struct NodeRecord<'a> {
    title: &'a str,
    #[serde(rename = "type")]
    node_type: &'a str,
    config: &'a NodeConfig,
}

/// Renders a graph as pretty-printed JSON.
pub fn render_graph_json(graph: &WorkflowGraph) -> Result<String, ExportError> {
    let document = GraphDocument {
        workflow_id: graph.id(),
        nodes: graph
            .nodes()
            .iter()
            .map(|(id, node)| {
                let record = NodeRecord {
                    title: &node.title,
                    node_type: &node.node_type,
                    config: &node.config,
                };
                (id, record)
            })
            .collect(),
        edges: graph.edges(),
    };
    let mut json = serde_json::to_string_pretty(&document)
        .map_err(|e| ExportError::Serialize(e.to_string()))?;
    json.push('\n');
    Ok(json)
}

/// Renders a graph in Graphviz DOT syntax.
pub fn render_graph_dot(graph: &WorkflowGraph) -> String {
    let mut dot = String::new();
    // Writing into a String cannot fail; the results are ignored throughout.
    let _ = writeln!(dot, "digraph \"{}\" {{", escape(graph.id()));
    let _ = writeln!(dot, "  rankdir=LR;");
    let _ = writeln!(dot, "  node [shape=box, style=rounded];");

    for (id, node) in graph.nodes() {
        let _ = writeln!(
            dot,
            "  \"{}\" [label=\"{}\\n#{}\\n{}\"];",
            escape(id.as_str()),
            escape(&node.title),
            escape(id.as_str()),
            escape(short_type(&node.node_type)),
        );
    }
    for edge in graph.edges() {
        let _ = writeln!(
            dot,
            "  \"{}\" -> \"{}\" [label=\"{} → {}\"];",
            escape(edge.source.as_str()),
            escape(edge.target.as_str()),
            escape(&edge.source_port),
            escape(&edge.target_port),
        );
    }
    dot.push_str("}\n");
    dot
}

fn short_type(node_type: &str) -> &str {
    node_type.rsplit('.').next().unwrap_or(node_type)
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(['\r', '\n'], " ")
}
