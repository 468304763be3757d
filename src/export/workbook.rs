use crate::codegen::{AssemblyResult, CodeBlock};
use crate::error::ExportError;
use crate::graph::WorkflowGraph;
use serde_json::{Value, json};
use std::fmt::Write;

/// The line that introduces a block in a script workbook.
///
/// Its shape is stable so that generated workbooks can be diffed and split.
pub fn block_separator(block: &CodeBlock) -> String {
    format!("# ---- {} ----", block_heading(block))
}

fn block_heading(block: &CodeBlock) -> String {
    format!(
        "node {}: {} [{}]",
        block.node_id,
        block.title.replace(['\r', '\n'], " "),
        block.state
    )
}

fn header(workflow_name: &str, component: &WorkflowGraph) -> String {
    format!(
        "Workbook for {} (component {})",
        workflow_name.replace(['\r', '\n'], " "),
        component.id()
    )
}

/// Renders a component as a Python script: imports, a shared `context`
/// dictionary, then every block behind its separator.
pub fn render_workbook_py(
    workflow_name: &str,
    component: &WorkflowGraph,
    assembly: &AssemblyResult,
) -> String {
    let mut script = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(script, "# {}", header(workflow_name, component));
    let _ = writeln!(script, "# Blocks appear in dependency order.");
    script.push('\n');
    for import in &assembly.imports {
        let _ = writeln!(script, "{}", import);
    }
    if !assembly.imports.is_empty() {
        script.push('\n');
    }
    script.push_str("context = {}\n");

    for block in &assembly.blocks {
        let _ = writeln!(script, "\n{}", block_separator(block));
        script.push_str(&block.source);
        if !block.source.ends_with('\n') {
            script.push('\n');
        }
    }
    script
}

/// Renders a component as a Jupyter notebook (nbformat 4).
pub fn render_workbook_ipynb(
    workflow_name: &str,
    component: &WorkflowGraph,
    assembly: &AssemblyResult,
) -> Result<String, ExportError> {
    let mut cells = vec![markdown_cell(&format!("# {}", header(workflow_name, component)))];

    let mut setup = assembly.imports.join("\n");
    if !setup.is_empty() {
        setup.push_str("\n\n");
    }
    setup.push_str("context = {}");
    cells.push(code_cell(&setup));

    for block in &assembly.blocks {
        cells.push(markdown_cell(&format!("## {}", block_heading(block))));
        cells.push(code_cell(&block.source));
    }

    let notebook = json!({
        "cells": cells,
        "metadata": {
            "kernelspec": {
                "display_name": "Python 3",
                "language": "python",
                "name": "python3"
            },
            "language_info": { "name": "python" }
        },
        "nbformat": 4,
        "nbformat_minor": 4
    });
    let mut rendered = serde_json::to_string_pretty(&notebook)
        .map_err(|e| ExportError::Serialize(e.to_string()))?;
    rendered.push('\n');
    Ok(rendered)
}

fn markdown_cell(text: &str) -> Value {
    json!({
        "cell_type": "markdown",
        "metadata": {},
        "source": source_lines(text)
    })
}

fn code_cell(text: &str) -> Value {
    json!({
        "cell_type": "code",
        "execution_count": null,
        "metadata": {},
        "outputs": [],
        "source": source_lines(text)
    })
}

/// Splits cell text into notebook source lines; every line but the last keeps
/// its newline.
fn source_lines(text: &str) -> Vec<&str> {
    text.trim_end_matches('\n').split_inclusive('\n').collect()
}
