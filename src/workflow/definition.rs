use crate::error::ParseError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The configuration payload attached to a node. Opaque to the converter;
/// only code generators interpret it.
pub type NodeConfig = serde_json::Map<String, serde_json::Value>;

/// A workflow description as loaded from disk, before any validation.
///
/// Every structural field is optional here so that a missing field is reported
/// by the graph builder as a `ParseError::MissingField` naming the record,
/// instead of surfacing as an opaque deserializer message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWorkflow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default, alias = "edges")]
    pub connections: Vec<RawConnection>,
}

/// One node record of a raw workflow.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNode {
    pub id: Option<String>,
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default, rename = "type", alias = "factory", alias = "nodeType")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub config: Option<NodeConfig>,
}

/// One connection record of a raw workflow.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConnection {
    pub source: Option<String>,
    #[serde(default, alias = "sourcePort")]
    pub source_port: Option<String>,
    pub target: Option<String>,
    #[serde(default, alias = "targetPort")]
    pub target_port: Option<String>,
}

impl RawWorkflow {
    /// Parses a workflow document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        serde_json::from_str(json).map_err(|e| ParseError::Json(e.to_string()))
    }

    /// Reads and parses a workflow document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ParseError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Fills in the workflow identifier when the document did not carry one.
    pub fn with_default_id(mut self, id: impl Into<String>) -> Self {
        if self.id.is_none() {
            self.id = Some(id.into());
        }
        self
    }
}
