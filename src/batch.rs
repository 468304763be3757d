//! Converts a root workflow together with every sub-workflow stored below it.

use crate::converter::Converter;
use crate::discovery::{discover_workflows, resolve_root_workflow};
use crate::error::BatchError;
use crate::export::{
    ExportOptions, ExportTarget, SUBWORKFLOW_DIR, WorkflowSummary, export_conversion,
};
use crate::workflow::{DEFAULT_WORKFLOW_ID, RawWorkflow};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Converts and exports the workflow at `path` and all nested sub-workflows.
///
/// The root workflow must parse, contain at least one node and export
/// cleanly; otherwise its `BatchError` is returned. Sub-workflows that fail
/// are logged and skipped, and empty sub-workflows are exported as-is.
pub fn convert_tree(
    path: impl AsRef<Path>,
    converter: &Converter,
    options: &ExportOptions,
) -> Result<Vec<WorkflowSummary>, BatchError> {
    let root_file = resolve_root_workflow(path)?;
    let root_dir = root_file.parent().unwrap_or(Path::new(".")).to_path_buf();
    let workflow_files = discover_workflows(&root_dir)?;

    let mut summaries = Vec::with_capacity(workflow_files.len());
    for workflow_file in &workflow_files {
        let target = export_target(workflow_file, &root_file, &root_dir);
        match convert_file(converter, workflow_file, &target, options) {
            Ok(summary) => summaries.push(summary),
            Err(e) if target.is_root() => return Err(e),
            Err(e) => error!("{}", e),
        }
    }
    Ok(summaries)
}

fn export_target(workflow_file: &Path, root_file: &Path, root_dir: &Path) -> ExportTarget {
    let name = workflow_name(workflow_file);
    if workflow_file == root_file {
        return ExportTarget::root(workflow_file, name);
    }
    let nested_dir = workflow_file
        .parent()
        .and_then(|dir| dir.strip_prefix(root_dir).ok())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&name));
    let label = format!("{}/{}", SUBWORKFLOW_DIR, nested_dir.display());
    ExportTarget::nested(workflow_file, label, nested_dir)
}

/// The name of the directory holding a workflow document.
fn workflow_name(workflow_file: &Path) -> String {
    workflow_file
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_WORKFLOW_ID.to_string())
}

fn convert_file(
    converter: &Converter,
    workflow_file: &Path,
    target: &ExportTarget,
    options: &ExportOptions,
) -> Result<WorkflowSummary, BatchError> {
    let parse_error = |source| BatchError::Parse {
        path: workflow_file.to_path_buf(),
        source,
    };
    let raw = RawWorkflow::from_file(workflow_file)
        .map_err(parse_error)?
        .with_default_id(workflow_name(workflow_file));
    let conversion = converter.convert(raw).map_err(parse_error)?;

    if conversion.components.is_empty() && target.is_root() {
        return Err(BatchError::EmptyWorkflow(workflow_file.to_path_buf()));
    }

    info!(
        workflow = %workflow_file.display(),
        components = conversion.components.len(),
        "exporting"
    );
    export_conversion(&conversion, target, options).map_err(|source| BatchError::Export {
        path: workflow_file.to_path_buf(),
        source,
    })
}
