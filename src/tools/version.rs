//! Best-effort version probing.
//!
//! Runs `<exe> <flag>` with a timeout and picks a display line out of the
//! merged stdout/stderr. Every failure degrades to [`UNKNOWN_VERSION`].

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::shell::{execute, CommandOptions, CommandSpec};
use crate::tools::catalog::ToolEntry;

/// Shown whenever no version line can be determined.
pub const UNKNOWN_VERSION: &str = "(version unknown)";

static VERSION_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\d+").unwrap());

/// Pick the version line from probe output.
///
/// The first line containing `banner` wins; otherwise the first line with a
/// dotted number; otherwise the sentinel. Lines are returned trimmed.
pub fn parse_version_output(output: &str, banner: Option<&str>) -> String {
    let lines = || output.lines().map(str::trim).filter(|l| !l.is_empty());

    if let Some(banner) = banner {
        if let Some(line) = lines().find(|l| l.contains(banner)) {
            return line.to_string();
        }
    }

    lines()
        .find(|l| VERSION_NUMBER.is_match(l))
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}

/// Run `exe flag` for at most `timeout` and parse its output.
///
/// A non-zero exit still has its output parsed, since several EDA tools
/// print their banner and then exit 1 for `--version`.
pub fn probe_version(exe: &Path, flag: &str, banner: Option<&str>, timeout: Duration) -> String {
    let spec = CommandSpec::new(exe.to_string_lossy()).arg(flag);

    match execute(&spec, &CommandOptions::with_timeout(timeout)) {
        Ok(result) if result.timed_out => {
            tracing::warn!("Version probe timed out after {:?}: {}", timeout, spec);
            UNKNOWN_VERSION.to_string()
        }
        Ok(result) => parse_version_output(&result.combined_output(), banner),
        Err(e) => {
            tracing::debug!("Version probe failed for {}: {}", spec, e);
            UNKNOWN_VERSION.to_string()
        }
    }
}

/// Probe a catalog tool using its own flag and banner.
pub fn probe_tool(tool: &ToolEntry, exe: &Path, timeout: Duration) -> String {
    probe_version(exe, &tool.version_flag, tool.banner.as_deref(), timeout)
}
