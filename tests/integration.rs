//! End-to-end tests: loading documents, discovering workflows on disk and
//! converting whole workflows.
mod common;
use common::*;
use graphscribe::discovery::{discover_workflows, resolve_root_workflow};
use graphscribe::prelude::*;
use std::fs;

#[test]
fn test_json_document_converts_per_component() {
    let raw = RawWorkflow::from_json(SALES_WORKFLOW_JSON).expect("Failed to parse document");
    let conversion = Converter::default().convert(raw).expect("Failed to convert");

    assert_eq!(conversion.graph.node_count(), 6);
    assert_eq!(conversion.components.len(), 2);
    assert!(conversion.is_complete());

    let (graph, assembly) = conversion.succeeded().next().unwrap();
    assert_eq!(graph.id(), "sales__g01");
    let order: Vec<&str> = assembly.blocks.iter().map(|b| b.node_id.as_str()).collect();
    assert_eq!(order, vec!["1", "2", "3", "4"]);
    assert_eq!(assembly.summary.ok, 4);

    let (_, second) = conversion.succeeded().nth(1).unwrap();
    assert_eq!(second.summary.idle, 1);
}

#[test]
fn test_unknown_single_node_workflow() {
    let raw = workflow(vec![node("A", "com.unknown.NodeFactory")], vec![]);
    let conversion = Converter::default().convert(raw).unwrap();

    assert_eq!(conversion.components.len(), 1);
    let assembly = conversion.components[0].outcome.as_ref().unwrap();
    assert_eq!(assembly.blocks.len(), 1);
    assert_eq!(assembly.blocks[0].state, BlockState::Idle);
    assert!(assembly.blocks[0].not_implemented);
    assert_eq!(assembly.summary.idle, 1);
}

#[test]
fn test_cyclic_component_does_not_block_others() {
    let raw = untyped_workflow(&["A", "B", "X", "Y"], &[("A", "B"), ("B", "A"), ("X", "Y")]);
    let conversion = Converter::default().convert(raw).unwrap();

    assert_eq!(conversion.components.len(), 2);
    assert!(!conversion.is_complete());

    let failures: Vec<&CyclicGraphError> = conversion.failed().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].graph_id, "test_flow__g01");

    let (graph, assembly) = conversion.succeeded().next().unwrap();
    assert_eq!(graph.id(), "test_flow__g02");
    assert_eq!(assembly.blocks.len(), 2);
}

#[test]
fn test_parse_errors_are_fatal() {
    let raw = workflow(vec![node("1", UNKNOWN_TYPE), node("1", UNKNOWN_TYPE)], vec![]);
    assert!(matches!(
        Converter::default().convert(raw),
        Err(ParseError::DuplicateNode(_))
    ));

    assert!(matches!(
        RawWorkflow::from_json("{ \"nodes\": [ }"),
        Err(ParseError::Json(_))
    ));
}

#[test]
fn test_empty_workflow_has_no_components() {
    let raw = RawWorkflow::from_json("{}").unwrap();
    let conversion = Converter::default().convert(raw).unwrap();
    assert!(conversion.components.is_empty());
    assert!(conversion.is_complete());
}

#[test]
fn test_document_aliases_and_default_id() {
    let json = r#"{
        "nodes": [
            { "id": "1", "factory": "x.Reader", "name": "Source" },
            { "id": "2", "nodeType": "x.Sink" }
        ],
        "edges": [
            { "source": "1", "source_port": "0", "target": "2", "target_port": "0" }
        ]
    }"#;
    let raw = RawWorkflow::from_json(json).unwrap().with_default_id("from_dir");
    let graph = GraphBuilder::build(raw).unwrap();

    assert_eq!(graph.id(), "from_dir");
    assert_eq!(graph.node("1").unwrap().title, "Source");
    assert_eq!(graph.node("2").unwrap().node_type, "x.Sink");
    assert_eq!(graph.edges()[0].source_port, "0");

    let named = RawWorkflow::from_json(r#"{ "id": "kept" }"#).unwrap().with_default_id("ignored");
    assert_eq!(named.id.as_deref(), Some("kept"));
}

#[test]
fn test_custom_format_through_into_workflow() {
    struct Step {
        name: &'static str,
        kind: &'static str,
    }
    struct Pipeline(Vec<Step>);

    impl IntoWorkflow for Pipeline {
        fn into_workflow(self) -> std::result::Result<RawWorkflow, ParseError> {
            let nodes = self.0.iter().map(|s| node(s.name, s.kind)).collect();
            let connections = self
                .0
                .windows(2)
                .map(|w| connection(w[0].name, w[1].name))
                .collect();
            Ok(RawWorkflow {
                id: Some("pipeline".to_string()),
                nodes,
                connections,
            })
        }
    }

    let pipeline = Pipeline(vec![
        Step { name: "load", kind: UNKNOWN_TYPE },
        Step { name: "clean", kind: UNKNOWN_TYPE },
        Step { name: "save", kind: UNKNOWN_TYPE },
    ]);
    let conversion = Converter::builder().build().convert(pipeline).unwrap();
    let assembly = conversion.components[0].outcome.as_ref().unwrap();
    let order: Vec<&str> = assembly.blocks.iter().map(|b| b.node_id.as_str()).collect();
    assert_eq!(order, vec!["load", "clean", "save"]);
}

#[test]
fn test_converter_builder_type_mapping() {
    let raw = workflow(
        vec![configured("1", "acme.Loader", serde_json::json!({ "path": "in.csv" }))],
        vec![],
    );
    let converter = Converter::builder()
        .with_type_mapping("acme.Loader", graphscribe::codegen::node_types::CSV_READER)
        .build();
    let conversion = converter.convert(raw).unwrap();
    let assembly = conversion.components[0].outcome.as_ref().unwrap();
    assert_eq!(assembly.blocks[0].state, BlockState::Ok);
    assert!(converter.registry().contains("acme.Loader"));
}

#[test]
fn test_resolve_root_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("workflow.json");
    fs::write(&file, SALES_WORKFLOW_JSON).unwrap();
    let canonical = file.canonicalize().unwrap();

    assert_eq!(resolve_root_workflow(dir.path()).unwrap(), canonical);
    assert_eq!(resolve_root_workflow(&file).unwrap(), canonical);

    let other = dir.path().join("notes.txt");
    fs::write(&other, "not a workflow").unwrap();
    assert!(matches!(
        resolve_root_workflow(&other),
        Err(DiscoveryError::NotAWorkflowFile(_))
    ));
    assert!(matches!(
        resolve_root_workflow(dir.path().join("missing")),
        Err(DiscoveryError::NotFound(_))
    ));

    let empty = tempfile::tempdir().unwrap();
    assert!(matches!(
        resolve_root_workflow(empty.path()),
        Err(DiscoveryError::NoWorkflowInDirectory(_))
    ));
}

#[test]
fn test_discover_nested_workflows_root_first() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    for sub in ["", "b_meta", "a_meta", "a_meta/inner"] {
        let path = root.join(sub);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("workflow.json"), "{}").unwrap();
    }
    fs::write(root.join("a_meta/settings.json"), "{}").unwrap();

    let found = discover_workflows(&root).unwrap();
    let relative: Vec<String> = found
        .iter()
        .map(|p| p.strip_prefix(&root).unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        relative,
        vec![
            "workflow.json",
            "a_meta/workflow.json",
            "b_meta/workflow.json",
            "a_meta/inner/workflow.json",
        ]
    );
    assert_eq!(found[0], resolve_root_workflow(&root).unwrap());
}
