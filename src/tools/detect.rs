//! Installed-tool detection.
//!
//! Detection never fails: a query that cannot run, or a path that cannot be
//! read, means "not installed".

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::shell::{CommandOptions, CommandResult, CommandSpec};

/// Runs a command; the installer's seam for subprocesses.
pub type RunCommand<'a> = &'a dyn Fn(&CommandSpec, &CommandOptions) -> Result<CommandResult>;

/// Ask the package database whether `tool` is installed.
///
/// Runs `<query...> <tool>` with output captured; exit status zero means
/// installed. The package version is not checked.
pub fn is_package_installed(tool: &str, query: &[String], run: RunCommand<'_>) -> bool {
    let Some(spec) = CommandSpec::from_argv(query, &[tool]) else {
        return false;
    };

    let installed = match run(&spec, &CommandOptions::captured()) {
        Ok(result) => result.success,
        Err(e) => {
            tracing::debug!("Package query for {} could not run: {}", tool, e);
            false
        }
    };
    tracing::debug!("{}: package installed = {}", tool, installed);
    installed
}

/// `~/.local/<tool>/bin`, the directory an installer script populates.
pub fn script_install_dir(tool: &str, home: &Path) -> PathBuf {
    home.join(".local").join(tool.to_lowercase()).join("bin")
}

/// A script tool counts as installed when its install directory exists.
pub fn is_script_installed(tool: &str, home: &Path) -> bool {
    let installed = script_install_dir(tool, home).exists();
    tracing::debug!("{}: script install dir present = {}", tool, installed);
    installed
}

/// The tool's executable inside its script install directory, if present.
pub fn script_executable(tool: &str, home: &Path) -> Option<PathBuf> {
    let key = tool.to_lowercase();
    let candidate = script_install_dir(&key, home).join(&key);
    (candidate.is_file() && is_executable(&candidate)).then_some(candidate)
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary by walking PATH entries in order.
///
/// Returns the first candidate that is a file with an executable bit.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    path_entries
        .iter()
        .map(|dir| dir.join(tool))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}
