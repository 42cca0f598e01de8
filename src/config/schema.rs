//! Configuration schema definitions.
//!
//! These structs map to `.edaboot/config.yml`. Every field has a default,
//! so an empty file (or no file at all) yields the built-in behavior.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdabootConfig {
    /// Global settings
    pub settings: Settings,

    /// Package manager commands
    pub package_manager: PackageManagerConfig,

    /// Per-tool additions and overrides, keyed by tool name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tools: BTreeMap<String, ToolConfig>,
}

/// Global settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Shell activation script that receives PATH exports
    /// (relative to the project root unless absolute)
    pub activation_script: PathBuf,

    /// Saved tool selection (relative to the project root unless absolute)
    pub selection_file: PathBuf,

    /// Version probe timeout in seconds
    pub probe_timeout: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            activation_script: PathBuf::from(DEFAULT_ACTIVATION_SCRIPT),
            selection_file: PathBuf::from(DEFAULT_SELECTION_FILE),
            probe_timeout: DEFAULT_PROBE_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// The probe timeout as a `Duration`.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout)
    }
}

pub const DEFAULT_ACTIVATION_SCRIPT: &str = ".venv/bin/activate";
pub const DEFAULT_SELECTION_FILE: &str = ".edaboot_tools.json";
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
pub const MAX_PROBE_TIMEOUT_SECS: u64 = 3600;

/// Package manager argv prefixes. The tool name is appended to each.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManagerConfig {
    /// Install command, e.g. `["sudo", "apt", "install", "-y"]`
    pub install: Vec<String>,

    /// Query command whose zero exit means "installed", e.g. `["dpkg", "-s"]`
    pub query: Vec<String>,
}

impl Default for PackageManagerConfig {
    fn default() -> Self {
        Self {
            install: ["sudo", "apt", "install", "-y"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            query: ["dpkg", "-s"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// How a configured tool is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMethod {
    /// Through the OS package manager
    Package,
    /// Through an installer shell script
    Script,
}

/// A tool added to, or overriding, the built-in catalog.
///
/// Unset fields keep the built-in value when the name matches a built-in tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Installation method (required for tools that are not built in)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<ToolMethod>,

    /// Label used in messages and activation-script markers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Installer script (script tools only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,

    /// Directory exported on PATH after a script install,
    /// written verbatim (e.g. `$HOME/.local/sby/bin`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_dir: Option<String>,

    /// Additional directories exported after a script install
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_paths: Vec<ExtraPathConfig>,

    /// Flag passed to the executable when probing its version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_flag: Option<String>,

    /// Substring identifying the version line in the probe output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

/// A directory exported alongside a script tool's own bin directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraPathConfig {
    /// Label for the activation-script marker
    pub label: String,
    /// Directory, written verbatim
    pub path: String,
}
