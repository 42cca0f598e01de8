//! The saved tool selection: a JSON array of tool names.

use std::fs;
use std::path::Path;

use crate::error::{EdabootError, Result};

/// Load the saved selection.
///
/// A missing file is an empty selection. A file that is not a JSON array
/// of strings is a `SelectionParse` error.
pub fn load_selection(path: &Path) -> Result<Vec<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No saved selection at {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content).map_err(|e| EdabootError::SelectionParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Save a selection as pretty-printed JSON, creating parent directories.
///
/// Duplicates are dropped; the first occurrence keeps its position.
pub fn save_selection(path: &Path, tools: &[String]) -> Result<()> {
    let mut unique: Vec<&String> = Vec::with_capacity(tools.len());
    for tool in tools {
        if !unique.contains(&tool) {
            unique.push(tool);
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&unique).map_err(anyhow::Error::from)?;
    fs::write(path, format!("{}\n", json))?;
    tracing::debug!("Saved {} tool(s) to {}", unique.len(), path.display());
    Ok(())
}
