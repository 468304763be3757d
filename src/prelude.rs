//! Prelude module for convenient imports
//!
//! Re-exports the types needed to load, convert and export a workflow.
//!
//! # Example
//!
//! ```rust,no_run
//! use graphscribe::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let conversion = Converter::default().convert(RawWorkflow::from_json("{\"nodes\": []}")?)?;
//! assert!(conversion.components.is_empty());
//! # Ok(())
//! # }
//! ```

// Pipeline
pub use crate::converter::{ComponentConversion, Converter, ConverterBuilder, WorkflowConversion};

// Raw input
pub use crate::workflow::{IntoWorkflow, NodeConfig, RawConnection, RawNode, RawWorkflow};

// Graph model and passes
pub use crate::graph::{Edge, GraphBuilder, Node, NodeId, WorkflowGraph, isolate, order};

// Code generation
pub use crate::codegen::{
    AssemblyResult, AssemblySummary, BlockAssembler, BlockState, CodeBlock, CodeGenerator,
    GeneratedCode, NodeCodeResolver, NodeContext, Registry, RegistryBuilder,
};

// Export
pub use crate::export::{
    ExportOptions, ExportTarget, GraphFormats, WorkbookFormats, WorkflowSummary,
    export_conversion,
};

// Error types
pub use crate::error::{
    BatchError, CyclicGraphError, DiscoveryError, ExportError, GenerateError, ParseError,
};

// Directory conversion
pub use crate::batch::convert_tree;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
