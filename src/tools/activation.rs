//! Persisting tool bin directories into a shell activation script.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Marker written above every appended export line.
pub const MARKER_PREFIX: &str = "# Added by edaboot for";

/// What [`ActivationScript::persist_path`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The export was appended.
    Added,
    /// The path already appears in the script; nothing was written.
    AlreadyPresent,
    /// The activation script does not exist; nothing was written.
    ScriptNotFound,
}

/// Handle to the activation script at a fixed location.
///
/// Holds only the path: each call opens, reads, appends and closes the file,
/// so no handle outlives the call.
#[derive(Debug, Clone)]
pub struct ActivationScript {
    path: PathBuf,
}

impl ActivationScript {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `relative` under `project_root`, or `relative` itself when absolute.
    pub fn in_project(project_root: &Path, relative: &Path) -> Self {
        Self::new(project_root.join(relative))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Append an export that prepends `bin_path` to `PATH`.
    ///
    /// Skipped when `bin_path` already occurs anywhere in the script, so
    /// repeating a call is a no-op. The check is textual: `$HOME/x` and
    /// `/home/me/x` count as different paths.
    pub fn persist_path(&self, label: &str, bin_path: &str) -> Result<PersistOutcome> {
        if !self.exists() {
            tracing::debug!("Activation script {} not found", self.path.display());
            return Ok(PersistOutcome::ScriptNotFound);
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.contains(bin_path) {
            tracing::debug!("{} already on PATH in {}", bin_path, self.path.display());
            return Ok(PersistOutcome::AlreadyPresent);
        }

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(export_block(label, bin_path).as_bytes())?;
        tracing::debug!("Added {} to {}", bin_path, self.path.display());
        Ok(PersistOutcome::Added)
    }
}

/// The lines appended for one path.
pub fn export_block(label: &str, bin_path: &str) -> String {
    format!(
        "\n{} {}\nexport PATH={}:$PATH\n",
        MARKER_PREFIX, label, bin_path
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn script_with(temp: &TempDir, contents: &str) -> ActivationScript {
        let path = temp.path().join(".venv/bin/activate");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        ActivationScript::new(path)
    }

    #[test]
    fn export_block_format() {
        assert_eq!(
            export_block("Yosys", "$HOME/.local/yosys/bin"),
            "\n# Added by edaboot for Yosys\nexport PATH=$HOME/.local/yosys/bin:$PATH\n"
        );
    }

    #[test]
    fn appends_export() {
        let temp = TempDir::new().unwrap();
        let script = script_with(&temp, "# venv\n");

        let outcome = script
            .persist_path("Verilator", "$HOME/.local/verilator/bin")
            .unwrap();
        assert_eq!(outcome, PersistOutcome::Added);

        let contents = fs::read_to_string(script.path()).unwrap();
        assert_eq!(
            contents,
            "# venv\n\n# Added by edaboot for Verilator\nexport PATH=$HOME/.local/verilator/bin:$PATH\n"
        );
    }

    #[test]
    fn same_path_twice_writes_once() {
        let temp = TempDir::new().unwrap();
        let script = script_with(&temp, "");

        let first = script.persist_path("nextpnr", "$HOME/.local/nextpnr/bin").unwrap();
        let second = script.persist_path("nextpnr", "$HOME/.local/nextpnr/bin").unwrap();
        assert_eq!(first, PersistOutcome::Added);
        assert_eq!(second, PersistOutcome::AlreadyPresent);

        let contents = fs::read_to_string(script.path()).unwrap();
        assert_eq!(contents.matches("export PATH=").count(), 1);
    }

    #[test]
    fn existing_mention_counts_as_present() {
        let temp = TempDir::new().unwrap();
        let script = script_with(&temp, "PATH=$HOME/.local/vivado/bin:$PATH\n");

        let outcome = script.persist_path("Vivado", "$HOME/.local/vivado/bin").unwrap();
        assert_eq!(outcome, PersistOutcome::AlreadyPresent);
    }

    #[test]
    fn equivalent_but_different_text_is_appended() {
        let temp = TempDir::new().unwrap();
        let script = script_with(&temp, "export PATH=/home/dev/.local/sby/bin:$PATH\n");

        let outcome = script.persist_path("SymbiYosys", "$HOME/.local/sby/bin").unwrap();
        assert_eq!(outcome, PersistOutcome::Added);
    }

    #[test]
    fn missing_script_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let script = ActivationScript::in_project(temp.path(), Path::new(".venv/bin/activate"));

        let outcome = script.persist_path("OpenROAD", "$HOME/.local/openroad/bin").unwrap();
        assert_eq!(outcome, PersistOutcome::ScriptNotFound);
        assert!(!script.path().exists());
    }

    #[test]
    fn in_project_keeps_absolute_paths() {
        let script = ActivationScript::in_project(Path::new("/work"), Path::new("/etc/profile.d/eda.sh"));
        assert_eq!(script.path(), Path::new("/etc/profile.d/eda.sh"));
    }
}
