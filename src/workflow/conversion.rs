use super::definition::RawWorkflow;
use crate::error::ParseError;

/// A trait for custom workflow formats that can be translated into the raw
/// records the graph builder consumes.
///
/// The bundled loader understands a JSON document; anything else (an editor's
/// export format, an in-memory model) plugs in by implementing this trait.
///
/// # Example
///
/// ```rust,no_run
/// use graphscribe::error::ParseError;
/// use graphscribe::workflow::{IntoWorkflow, RawConnection, RawNode, RawWorkflow};
///
/// struct Step { name: String, kind: String }
/// struct Pipeline { steps: Vec<Step> }
///
/// impl IntoWorkflow for Pipeline {
///     fn into_workflow(self) -> Result<RawWorkflow, ParseError> {
///         let nodes = self
///             .steps
///             .iter()
///             .map(|s| RawNode {
///                 id: Some(s.name.clone()),
///                 title: None,
///                 node_type: Some(s.kind.clone()),
///                 config: None,
///             })
///             .collect();
///         // Chain consecutive steps.
///         let connections = self
///             .steps
///             .windows(2)
///             .map(|w| RawConnection {
///                 source: Some(w[0].name.clone()),
///                 source_port: Some("1".to_string()),
///                 target: Some(w[1].name.clone()),
///                 target_port: Some("1".to_string()),
///             })
///             .collect();
///         Ok(RawWorkflow { id: Some("pipeline".to_string()), nodes, connections })
///     }
/// }
/// ```
pub trait IntoWorkflow {
    /// Consumes the object and converts it into raw workflow records.
    fn into_workflow(self) -> Result<RawWorkflow, ParseError>;
}

impl IntoWorkflow for RawWorkflow {
    fn into_workflow(self) -> Result<RawWorkflow, ParseError> {
        Ok(self)
    }
}
