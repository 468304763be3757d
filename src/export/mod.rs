//! Writers that turn a converted workflow into files on disk.
//!
//! Every renderer is a pure function of its input; the `write_*` helpers and
//! `export_conversion` only add file handling on top.

use crate::codegen::AssemblyResult;
use crate::converter::{ComponentConversion, WorkflowConversion};
use crate::error::ExportError;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

mod graph;
mod workbook;

pub use graph::{render_graph_json, render_graph_dot};
pub use workbook::{block_separator, render_workbook_ipynb, render_workbook_py};

/// Directory below the output directory that receives nested sub-workflows.
pub const SUBWORKFLOW_DIR: &str = "subworkflows";

/// Which graph description files to write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GraphFormats {
    #[default]
    Both,
    Json,
    Dot,
    Off,
}

impl GraphFormats {
    fn json(self) -> bool {
        matches!(self, GraphFormats::Both | GraphFormats::Json)
    }

    fn dot(self) -> bool {
        matches!(self, GraphFormats::Both | GraphFormats::Dot)
    }
}

/// Which workbook documents to write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkbookFormats {
    #[default]
    Both,
    Py,
    Ipynb,
}

impl WorkbookFormats {
    fn py(self) -> bool {
        matches!(self, WorkbookFormats::Both | WorkbookFormats::Py)
    }

    fn ipynb(self) -> bool {
        matches!(self, WorkbookFormats::Both | WorkbookFormats::Ipynb)
    }
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    pub graph: GraphFormats,
    pub workbook: WorkbookFormats,
}

impl ExportOptions {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            graph: GraphFormats::default(),
            workbook: WorkbookFormats::default(),
        }
    }

    /// The directory a workflow's files go to.
    ///
    /// Sub-workflows mirror their directory below `<out_dir>/subworkflows/`,
    /// so two nested workflows with the same folder name never share files.
    pub fn target_dir(&self, nested_dir: Option<&Path>) -> PathBuf {
        let Some(nested_dir) = nested_dir else {
            return self.out_dir.clone();
        };
        nested_dir
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(file_stem(&part.to_string_lossy())),
                _ => None,
            })
            .fold(self.out_dir.join(SUBWORKFLOW_DIR), |dir, part| dir.join(part))
    }
}

/// The workflow document a conversion came from and where its files belong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    /// Label used in workbook headers.
    pub name: String,
    /// The workflow document, recorded in the summary.
    pub source: PathBuf,
    /// Directory of a sub-workflow relative to the root workflow's directory.
    pub nested_dir: Option<PathBuf>,
}

impl ExportTarget {
    pub fn root(source: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            nested_dir: None,
        }
    }

    pub fn nested(
        source: impl Into<PathBuf>,
        name: impl Into<String>,
        nested_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            nested_dir: Some(nested_dir.into()),
        }
    }

    pub fn is_root(&self) -> bool {
        self.nested_dir.is_none()
    }
}

/// Maps an identifier onto a single file name component.
///
/// Only ASCII letters, digits, `_`, `-` and `.` survive; everything else,
/// path separators included, becomes `_`. A result made of dots only is
/// prefixed with `_` so it can never name a parent or current directory.
pub fn file_stem(id: &str) -> String {
    let stem: String = id
        .chars()
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '_' | '-' | '.' => c,
            _ => '_',
        })
        .collect();
    if stem.chars().all(|c| c == '.') {
        format!("_{}", stem)
    } else {
        stem
    }
}

/// What was written for one component, and how well it converted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentSummary {
    pub workflow_id: String,
    pub json: Option<PathBuf>,
    pub dot: Option<PathBuf>,
    pub workbook_py: Option<PathBuf>,
    pub workbook_ipynb: Option<PathBuf>,
    pub nodes: usize,
    pub edges: usize,
    pub idle: usize,
    pub errors: usize,
    pub not_implemented_count: usize,
    /// `"title (type)"` of every idle node, sorted and deduplicated.
    pub not_implemented_names: Vec<String>,
    /// Set when the component could not be ordered.
    pub cycle: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowSummary {
    /// Path of the workflow document.
    pub workflow: PathBuf,
    pub name: String,
    pub total_components: usize,
    pub components: Vec<ComponentSummary>,
}

/// Writes the graph files and workbooks of every component of a conversion.
///
/// Cyclic components still get their graph files; only their workbooks are
/// skipped, and the cycle is recorded in the summary.
pub fn export_conversion(
    conversion: &WorkflowConversion,
    target: &ExportTarget,
    options: &ExportOptions,
) -> Result<WorkflowSummary, ExportError> {
    let dir = options.target_dir(target.nested_dir.as_deref());
    fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;

    let components = conversion
        .components
        .iter()
        .map(|component| export_component(component, &target.name, &dir, options))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WorkflowSummary {
        workflow: target.source.clone(),
        name: target.name.clone(),
        total_components: components.len(),
        components,
    })
}

fn export_component(
    component: &ComponentConversion,
    workflow_name: &str,
    dir: &Path,
    options: &ExportOptions,
) -> Result<ComponentSummary, ExportError> {
    let graph = &component.graph;
    let stem = file_stem(graph.id());
    let mut summary = ComponentSummary {
        workflow_id: graph.id().to_string(),
        nodes: graph.node_count(),
        edges: graph.edges().len(),
        ..Default::default()
    };

    if options.graph.json() {
        let path = dir.join(format!("{}.json", stem));
        summary.json = Some(write_file(&path, &render_graph_json(graph)?)?);
    }
    if options.graph.dot() {
        let path = dir.join(format!("{}.dot", stem));
        summary.dot = Some(write_file(&path, &render_graph_dot(graph))?);
    }

    let assembly = match &component.outcome {
        Ok(assembly) => assembly,
        Err(e) => {
            summary.cycle = Some(e.to_string());
            return Ok(summary);
        }
    };

    if options.workbook.py() {
        let path = dir.join(format!("{}_workbook.py", stem));
        let script = render_workbook_py(workflow_name, graph, assembly);
        summary.workbook_py = Some(write_file(&path, &script)?);
    }
    if options.workbook.ipynb() {
        let path = dir.join(format!("{}_workbook.ipynb", stem));
        let notebook = render_workbook_ipynb(workflow_name, graph, assembly)?;
        summary.workbook_ipynb = Some(write_file(&path, &notebook)?);
    }

    summary.idle = assembly.summary.idle;
    summary.errors = assembly.summary.errors;
    summary.not_implemented_names = not_implemented_names(assembly);
    summary.not_implemented_count = summary.not_implemented_names.len();
    Ok(summary)
}

fn not_implemented_names(assembly: &AssemblyResult) -> Vec<String> {
    assembly
        .blocks
        .iter()
        .filter(|b| b.not_implemented)
        .map(|b| format!("{} ({})", b.title, b.node_type))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn write_file(path: &Path, content: &str) -> Result<PathBuf, ExportError> {
    fs::write(path, content).map_err(|e| io_error(path, e))?;
    debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(path.to_path_buf())
}

fn io_error(path: &Path, e: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}
