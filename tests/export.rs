//! Tests for the graph and workbook exporters.
mod common;
use common::*;
use graphscribe::export::{
    block_separator, file_stem, render_graph_dot, render_graph_json, render_workbook_ipynb,
    render_workbook_py,
};
use graphscribe::prelude::*;
use std::fs;
use std::path::Path;

fn sales_conversion() -> WorkflowConversion {
    let raw = RawWorkflow::from_json(SALES_WORKFLOW_JSON).expect("Fixture must parse");
    Converter::default().convert(raw).expect("Fixture must convert")
}

#[test]
fn test_graph_json_lists_nodes_and_edges() {
    let conversion = sales_conversion();
    let component = &conversion.components[0].graph;
    let json: serde_json::Value =
        serde_json::from_str(&render_graph_json(component).unwrap()).unwrap();

    assert_eq!(json["workflow_id"], "sales__g01");
    assert_eq!(json["nodes"]["2"]["title"], "Keep columns");
    assert_eq!(json["nodes"]["4"]["config"]["path"], "out/report.csv");
    assert_eq!(json["edges"].as_array().unwrap().len(), 3);
    assert_eq!(json["edges"][0]["source"], "1");
    assert_eq!(json["edges"][0]["target_port"], "1");
}

#[test]
fn test_graph_dot_escapes_labels() {
    let raw = workflow(
        vec![
            RawNode {
                title: Some("Say \"hi\"".to_string()),
                ..node("1", "a.b.First")
            },
            node("2", "a.b.Second"),
        ],
        vec![connection_ports("1", "1", "2", "3")],
    );
    let graph = GraphBuilder::build(raw).unwrap();
    let dot = render_graph_dot(&graph);

    assert!(dot.starts_with("digraph \"test_flow\" {\n"));
    assert!(dot.contains("\"1\" [label=\"Say \\\"hi\\\"\\n#1\\nFirst\"];"));
    assert!(dot.contains("\"1\" -> \"2\" [label=\"1 → 3\"];"));
    assert!(dot.ends_with("}\n"));
}

#[test]
fn test_workbook_script_layout() {
    let conversion = sales_conversion();
    let component = &conversion.components[0];
    let assembly = component.outcome.as_ref().unwrap();
    let script = render_workbook_py("sales", &component.graph, assembly);

    assert!(script.starts_with("# Workbook for sales (component sales__g01)\n"));
    let pandas = script.find("import pandas as pd").unwrap();
    let context = script.find("context = {}").unwrap();
    assert!(pandas < context);

    // Blocks appear behind their separators, in order.
    let positions: Vec<usize> = assembly
        .blocks
        .iter()
        .map(|b| script.find(&block_separator(b)).expect("separator present"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(script.contains("# ---- node 1: Read sales [OK] ----\n"));
}

#[test]
fn test_workbook_notebook_is_valid_nbformat() {
    let conversion = sales_conversion();
    let component = &conversion.components[1];
    let assembly = component.outcome.as_ref().unwrap();
    let rendered = render_workbook_ipynb("sales", &component.graph, assembly).unwrap();
    let notebook: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    assert_eq!(notebook["nbformat"], 4);
    let cells = notebook["cells"].as_array().unwrap();
    // title + setup + (heading, code) per block
    assert_eq!(cells.len(), 2 + 2 * assembly.blocks.len());
    assert_eq!(cells[0]["cell_type"], "markdown");
    assert_eq!(cells[1]["cell_type"], "code");
    assert_eq!(cells[3]["source"][0], "df = pd.read_csv(\"data/targets.csv\", sep=\";\")\n");
    assert_eq!(cells[4]["source"][0], "## node 11: Python Script [IDLE]");
}

#[test]
fn test_renderers_are_byte_stable() {
    let first = sales_conversion();
    let second = sales_conversion();
    for (a, b) in first.components.iter().zip(&second.components) {
        let (ra, rb) = (a.outcome.as_ref().unwrap(), b.outcome.as_ref().unwrap());
        assert_eq!(render_graph_json(&a.graph).unwrap(), render_graph_json(&b.graph).unwrap());
        assert_eq!(render_graph_dot(&a.graph), render_graph_dot(&b.graph));
        assert_eq!(
            render_workbook_py("sales", &a.graph, ra),
            render_workbook_py("sales", &b.graph, rb)
        );
        assert_eq!(
            render_workbook_ipynb("sales", &a.graph, ra).unwrap(),
            render_workbook_ipynb("sales", &b.graph, rb).unwrap()
        );
    }
}

#[test]
fn test_export_conversion_writes_files_and_summary() {
    let out = tempfile::tempdir().unwrap();
    let conversion = sales_conversion();
    let options = ExportOptions::new(out.path());

    let target = ExportTarget::root("sales/workflow.json", "sales");
    let summary = export_conversion(&conversion, &target, &options).unwrap();

    assert_eq!(summary.workflow, Path::new("sales/workflow.json"));
    assert_eq!(summary.name, "sales");
    assert_eq!(summary.total_components, 2);
    for name in [
        "sales__g01.json",
        "sales__g01.dot",
        "sales__g01_workbook.py",
        "sales__g01_workbook.ipynb",
        "sales__g02_workbook.py",
    ] {
        assert!(out.path().join(name).is_file(), "{} should exist", name);
    }

    let first = &summary.components[0];
    assert_eq!((first.nodes, first.edges, first.idle), (4, 3, 0));
    assert_eq!(
        first.workbook_py.as_deref(),
        Some(out.path().join("sales__g01_workbook.py").as_path())
    );

    let second = &summary.components[1];
    assert_eq!(second.idle, 1);
    assert_eq!(second.not_implemented_count, 1);
    assert_eq!(
        second.not_implemented_names,
        vec!["Python Script (org.knime.python3.nodes.script.PythonScriptNodeFactory)".to_string()]
    );

    let written = fs::read_to_string(out.path().join("sales__g01_workbook.py")).unwrap();
    let component = &conversion.components[0];
    assert_eq!(
        written,
        render_workbook_py("sales", &component.graph, component.outcome.as_ref().unwrap())
    );
}

#[test]
fn test_export_honours_format_selection_and_subworkflow_dir() {
    let out = tempfile::tempdir().unwrap();
    let conversion = sales_conversion();
    let mut options = ExportOptions::new(out.path());
    options.graph = GraphFormats::Off;
    options.workbook = WorkbookFormats::Ipynb;

    let target = ExportTarget::nested("meta/workflow.json", "subworkflows/meta", "meta");
    let summary = export_conversion(&conversion, &target, &options).unwrap();
    let dir = out.path().join("subworkflows").join("meta");

    assert!(dir.join("sales__g01_workbook.ipynb").is_file());
    assert!(!dir.join("sales__g01_workbook.py").exists());
    assert!(!dir.join("sales__g01.json").exists());
    assert!(summary.components.iter().all(|c| c.json.is_none() && c.dot.is_none()));
}

#[test]
fn test_cyclic_component_exports_graph_but_no_workbook() {
    let out = tempfile::tempdir().unwrap();
    let raw = untyped_workflow(&["A", "B", "C"], &[("A", "B"), ("B", "A")]);
    let conversion = Converter::default().convert(raw).unwrap();

    let target = ExportTarget::root("workflow.json", "test_flow");
    let summary = export_conversion(&conversion, &target, &ExportOptions::new(out.path())).unwrap();

    let cyclic = &summary.components[0];
    assert!(cyclic.cycle.as_deref().unwrap().contains("test_flow__g01"));
    assert!(cyclic.json.is_some());
    assert!(cyclic.workbook_py.is_none());
    assert!(!out.path().join("test_flow__g01_workbook.py").exists());

    let healthy = &summary.components[1];
    assert!(healthy.cycle.is_none());
    assert!(healthy.workbook_py.is_some());
}

#[test]
fn test_file_stem_keeps_names_inside_one_directory() {
    assert_eq!(file_stem("sales__g01"), "sales__g01");
    assert_eq!(file_stem("../escaped__g01"), ".._escaped__g01");
    assert_eq!(file_stem("a/b\\c d"), "a_b_c_d");
    assert_eq!(file_stem(".."), "_..");
    assert_eq!(file_stem(""), "_");
}

#[test]
fn test_export_never_writes_outside_out_dir() {
    let sandbox = tempfile::tempdir().unwrap();
    let out = sandbox.path().join("out");
    let mut raw = untyped_workflow(&["A"], &[]);
    raw.id = Some("../escaped".to_string());
    let conversion = Converter::default().convert(raw).unwrap();

    let target = ExportTarget::root("workflow.json", "escaped");
    let summary = export_conversion(&conversion, &target, &ExportOptions::new(&out)).unwrap();

    let component = &summary.components[0];
    assert_eq!(component.workflow_id, "../escaped__g01");
    assert_eq!(component.json.as_deref(), Some(out.join(".._escaped__g01.json").as_path()));
    assert!(out.join(".._escaped__g01_workbook.py").is_file());
    assert!(!sandbox.path().join("escaped__g01.json").exists());
}

#[test]
fn test_same_named_subworkflows_do_not_overwrite_each_other() {
    let out = tempfile::tempdir().unwrap();
    let options = ExportOptions::new(out.path());
    let mut first = untyped_workflow(&["A"], &[]);
    first.id = Some("Metanode".to_string());
    let mut second = untyped_workflow(&["B"], &[]);
    second.id = Some("Metanode".to_string());

    for (raw, dir) in [(first, "a/Metanode"), (second, "b/Metanode")] {
        let conversion = Converter::default().convert(raw).unwrap();
        let target = ExportTarget::nested(
            Path::new(dir).join("workflow.json"),
            format!("subworkflows/{}", dir),
            dir,
        );
        export_conversion(&conversion, &target, &options).unwrap();
    }

    let subworkflows = out.path().join("subworkflows");
    let read = |dir: &str| fs::read_to_string(subworkflows.join(dir).join("Metanode__g01.json"));
    assert!(read("a/Metanode").unwrap().contains("\"A\""));
    assert!(read("b/Metanode").unwrap().contains("\"B\""));
    assert!(!subworkflows.join("Metanode__g01.json").exists());
}

#[test]
fn test_target_dir_ignores_parent_components() {
    let options = ExportOptions::new("out");
    assert_eq!(options.target_dir(None), Path::new("out"));
    assert_eq!(
        options.target_dir(Some(Path::new("../a/Meta node"))),
        Path::new("out/subworkflows/a/Meta_node")
    );
}
