use super::{Edge, Node, NodeId, WorkflowGraph};
use crate::error::ParseError;
use crate::workflow::{DEFAULT_WORKFLOW_ID, IntoWorkflow, RawConnection, RawNode};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::debug;

/// Validates raw workflow records and turns them into a `WorkflowGraph`.
pub struct GraphBuilder;

impl GraphBuilder {
    /// Builds the graph for a workflow.
    ///
    /// Fails when a node identifier repeats, when a connection references a
    /// node that does not exist, or when a required field is absent. Nothing
    /// is merged or overwritten silently.
    pub fn build(workflow: impl IntoWorkflow) -> Result<WorkflowGraph, ParseError> {
        let raw = workflow.into_workflow()?;
        let id = raw.id.unwrap_or_else(|| DEFAULT_WORKFLOW_ID.to_string());

        let mut nodes = BTreeMap::new();
        for (index, raw_node) in raw.nodes.into_iter().enumerate() {
            let node = Self::build_node(index, raw_node)?;
            match nodes.entry(node.id.clone()) {
                Entry::Occupied(_) => return Err(ParseError::DuplicateNode(node.id)),
                Entry::Vacant(slot) => {
                    slot.insert(node);
                }
            }
        }

        let edges = raw
            .connections
            .into_iter()
            .enumerate()
            .map(|(index, conn)| Self::build_edge(index, conn, &nodes))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            workflow = %id,
            nodes = nodes.len(),
            edges = edges.len(),
            "built workflow graph"
        );
        Ok(WorkflowGraph::from_parts(id, nodes, edges))
    }

    fn build_node(index: usize, raw: RawNode) -> Result<Node, ParseError> {
        let id = raw.id.ok_or_else(|| ParseError::MissingField {
            record: format!("Node #{}", index),
            field: "id",
        })?;
        let node_type = raw.node_type.ok_or_else(|| ParseError::MissingField {
            record: format!("Node '{}'", id),
            field: "type",
        })?;
        let title = raw
            .title
            .unwrap_or_else(|| short_type_name(&node_type).to_string());

        Ok(Node {
            id: NodeId::new(id),
            title,
            node_type,
            config: raw.config.unwrap_or_default(),
        })
    }

    fn build_edge(
        index: usize,
        raw: RawConnection,
        nodes: &BTreeMap<NodeId, Node>,
    ) -> Result<Edge, ParseError> {
        let missing = |field| ParseError::MissingField {
            record: format!("Connection #{}", index),
            field,
        };
        let source = NodeId::new(raw.source.ok_or_else(|| missing("source"))?);
        let source_port = raw.source_port.ok_or_else(|| missing("source_port"))?;
        let target = NodeId::new(raw.target.ok_or_else(|| missing("target"))?);
        let target_port = raw.target_port.ok_or_else(|| missing("target_port"))?;

        for (endpoint, node_id) in [("source", &source), ("target", &target)] {
            if !nodes.contains_key(node_id) {
                return Err(ParseError::DanglingEdge {
                    connection_index: index,
                    endpoint,
                    missing_node_id: node_id.clone(),
                });
            }
        }

        Ok(Edge {
            source,
            source_port,
            target,
            target_port,
        })
    }
}

/// The last dotted segment of a type identifier, used as a fallback title.
fn short_type_name(node_type: &str) -> &str {
    node_type.rsplit('.').next().unwrap_or(node_type)
}
