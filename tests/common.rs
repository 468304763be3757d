//! Common test utilities for building raw workflows.
use graphscribe::prelude::*;

/// A type identifier no generator is registered for.
#[allow(dead_code)]
pub const UNKNOWN_TYPE: &str = "com.unknown.NodeFactory";

/// A node of the given type with an empty configuration.
#[allow(dead_code)]
pub fn node(id: &str, node_type: &str) -> RawNode {
    RawNode {
        id: Some(id.to_string()),
        title: Some(format!("Node {}", id)),
        node_type: Some(node_type.to_string()),
        config: None,
    }
}

/// A node with a configuration payload given as a JSON object.
#[allow(dead_code)]
pub fn configured(id: &str, node_type: &str, config: serde_json::Value) -> RawNode {
    let config = match config {
        serde_json::Value::Object(map) => map,
        other => panic!("configuration must be an object, got {}", other),
    };
    RawNode {
        config: Some(config),
        ..node(id, node_type)
    }
}

/// A connection from output port 1 of `source` to input port 1 of `target`.
#[allow(dead_code)]
pub fn connection(source: &str, target: &str) -> RawConnection {
    connection_ports(source, "1", target, "1")
}

#[allow(dead_code)]
pub fn connection_ports(
    source: &str,
    source_port: &str,
    target: &str,
    target_port: &str,
) -> RawConnection {
    RawConnection {
        source: Some(source.to_string()),
        source_port: Some(source_port.to_string()),
        target: Some(target.to_string()),
        target_port: Some(target_port.to_string()),
    }
}

#[allow(dead_code)]
pub fn workflow(nodes: Vec<RawNode>, connections: Vec<RawConnection>) -> RawWorkflow {
    RawWorkflow {
        id: Some("test_flow".to_string()),
        nodes,
        connections,
    }
}

/// A workflow whose nodes all have the unknown type, wired by `(source, target)` pairs.
#[allow(dead_code)]
pub fn untyped_workflow(ids: &[&str], edges: &[(&str, &str)]) -> RawWorkflow {
    workflow(
        ids.iter().map(|id| node(id, UNKNOWN_TYPE)).collect(),
        edges.iter().map(|(s, t)| connection(s, t)).collect(),
    )
}

#[allow(dead_code)]
pub fn ids(order: &[NodeId]) -> Vec<&str> {
    order.iter().map(NodeId::as_str).collect()
}

/// A small, fully supported pipeline: read -> filter columns -> sort -> write,
/// plus an unrelated reader feeding an unknown node.
///
/// Uses the JSON document format, including camelCase port names.
#[allow(dead_code)]
pub const SALES_WORKFLOW_JSON: &str = r#"{
    "id": "sales",
    "nodes": [
        {
            "id": "1",
            "title": "Read sales",
            "type": "org.knime.base.node.io.filehandling.csv.reader.CSVTableReaderNodeFactory",
            "config": { "path": "data/sales.csv" }
        },
        {
            "id": "2",
            "title": "Keep columns",
            "type": "org.knime.base.node.preproc.filter.column.DataColumnSpecFilterNodeFactory",
            "config": { "include": ["region", "amount"] }
        },
        {
            "id": "3",
            "title": "Sort by amount",
            "type": "org.knime.base.node.preproc.sorter.SorterNodeFactory",
            "config": { "columns": ["amount"], "ascending": false }
        },
        {
            "id": "4",
            "title": "Write report",
            "type": "org.knime.base.node.io.filehandling.csv.writer.CSVWriter2NodeFactory",
            "config": { "path": "out/report.csv" }
        },
        {
            "id": "10",
            "title": "Read targets",
            "type": "org.knime.base.node.io.filehandling.csv.reader.CSVTableReaderNodeFactory",
            "config": { "path": "data/targets.csv", "separator": ";" }
        },
        {
            "id": "11",
            "title": "Python Script",
            "type": "org.knime.python3.nodes.script.PythonScriptNodeFactory"
        }
    ],
    "connections": [
        { "source": "1", "sourcePort": "1", "target": "2", "targetPort": "1" },
        { "source": "2", "sourcePort": "1", "target": "3", "targetPort": "1" },
        { "source": "3", "sourcePort": "1", "target": "4", "targetPort": "1" },
        { "source": "10", "sourcePort": "1", "target": "11", "targetPort": "1" }
    ]
}"#;
