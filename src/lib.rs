//! # graphscribe - Workflow to Workbook Converter
//!
//! **graphscribe** turns a declarative, node-and-edge dataflow workflow into
//! ordered code. Each independent part of the workflow becomes its own
//! workbook whose blocks, run top to bottom, reproduce the workflow's
//! computation.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Read a workflow document into `RawWorkflow` records (or implement
//!     `IntoWorkflow` for your own format).
//! 2.  **Build**: `GraphBuilder` validates the records into an immutable `WorkflowGraph`.
//! 3.  **Isolate**: `isolate` splits the graph into weakly-connected components.
//! 4.  **Assemble**: `BlockAssembler` orders each component topologically and asks the
//!     `Registry` for one code block per node. Unknown node types become `IDLE`
//!     placeholder blocks instead of failing the run.
//! 5.  **Export**: the `export` module renders graphs as JSON/DOT and workbooks as
//!     Python scripts or Jupyter notebooks.
//!
//! `Converter` runs steps 2 to 4 in one call; `batch::convert_tree` runs the
//! whole pipeline over a workflow directory and its nested sub-workflows.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use graphscribe::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let raw = RawWorkflow::from_file("my_flow/workflow.json")?;
//!     let conversion = Converter::default().convert(raw)?;
//!
//!     for component in &conversion.components {
//!         match &component.outcome {
//!             Ok(assembly) => println!(
//!                 "{}: {} blocks, {} idle",
//!                 component.graph.id(),
//!                 assembly.summary.total,
//!                 assembly.summary.idle
//!             ),
//!             Err(cycle) => eprintln!("{}", cycle),
//!         }
//!     }
//!
//!     let options = ExportOptions::new("out_graphs");
//!     let summary = export_conversion(
//!         &conversion,
//!         &ExportTarget::root("my_flow/workflow.json", "my_flow"),
//!         &options,
//!     )?;
//!     println!("{} components written", summary.total_components);
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod codegen;
pub mod converter;
pub mod discovery;
pub mod error;
pub mod export;
pub mod graph;
pub mod prelude;
pub mod workflow;
