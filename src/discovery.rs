use crate::error::DiscoveryError;
use crate::workflow::WORKFLOW_FILE_NAME;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Resolves a user-supplied path to the root workflow document.
///
/// A file must be named `workflow.json`. A directory must contain
/// `workflow.json` directly; no recursive search is done here. The returned
/// path is canonical.
pub fn resolve_root_workflow(path: impl AsRef<Path>) -> Result<PathBuf, DiscoveryError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DiscoveryError::NotFound(path.to_path_buf()));
    }

    let workflow_file = if path.is_file() {
        if !path.file_name().is_some_and(|name| name == WORKFLOW_FILE_NAME) {
            return Err(DiscoveryError::NotAWorkflowFile(path.to_path_buf()));
        }
        path.to_path_buf()
    } else {
        let candidate = path.join(WORKFLOW_FILE_NAME);
        if !candidate.is_file() {
            return Err(DiscoveryError::NoWorkflowInDirectory(path.to_path_buf()));
        }
        candidate
    };

    workflow_file
        .canonicalize()
        .map_err(|e| DiscoveryError::Unreadable {
            path: workflow_file.clone(),
            message: e.to_string(),
        })
}

/// Finds every workflow document at or below `root_dir`.
///
/// The result is sorted by depth and then by path, so the root directory's own
/// document (when present) comes first and nested sub-workflows follow in a
/// stable order.
pub fn discover_workflows(root_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, DiscoveryError> {
    let root_dir = root_dir.as_ref();
    let mut found = Vec::new();
    for entry in WalkDir::new(root_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| DiscoveryError::Unreadable {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root_dir.to_path_buf()),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() && entry.file_name() == WORKFLOW_FILE_NAME {
            found.push(entry.into_path());
        }
    }
    found.sort_by(|a, b| {
        let depth = |p: &PathBuf| p.components().count();
        depth(a).cmp(&depth(b)).then_with(|| a.cmp(b))
    });

    debug!(root = %root_dir.display(), workflows = found.len(), "discovered workflows");
    Ok(found)
}
