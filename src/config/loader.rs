//! Configuration file discovery and loading.

use crate::config::schema::EdabootConfig;
use crate::error::{EdabootError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding project configuration.
pub const CONFIG_DIR: &str = ".edaboot";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yml";

/// Location of the project config for `project_root`, whether or not it exists.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Find the project root by walking up from `start`.
///
/// A directory containing `.edaboot/` wins; otherwise the nearest `.git`.
/// Returns `None` when neither is found.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<EdabootConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EdabootError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EdabootError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into `EdabootConfig`.
///
/// An empty document is the default config.
pub fn parse_config(content: &str, source_path: &Path) -> Result<EdabootConfig> {
    if content.trim().is_empty() {
        return Ok(EdabootConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| EdabootError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config with optional path override.
///
/// An explicit `config_override` must exist. Without one, the project config
/// is used when present and the defaults otherwise.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<EdabootConfig> {
    if let Some(override_path) = config_override {
        return load_config_file(override_path);
    }

    let path = project_config_path(project_root);
    if path.is_file() {
        tracing::debug!("Loading config from {}", path.display());
        load_config_file(&path)
    } else {
        tracing::debug!("No project config at {}, using defaults", path.display());
        Ok(EdabootConfig::default())
    }
}
