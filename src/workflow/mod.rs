pub mod conversion;
pub mod definition;

pub use conversion::*;
pub use definition::*;

/// File name of a workflow document inside a workflow directory.
pub const WORKFLOW_FILE_NAME: &str = "workflow.json";

/// Identifier used when neither the document nor the caller names the workflow.
pub const DEFAULT_WORKFLOW_ID: &str = "workflow";
