//! The EDA tool catalog and everything that acts on it.
//!
//! - [`Catalog`] - Known tools and how each is installed
//! - [`ToolInstaller`] - Detect, probe, confirm and install
//! - [`ActivationScript`] - Persist bin directories onto `PATH`
//! - [`load_selection`] / [`save_selection`] - The saved tool selection
//!
//! # Example
//!
//! ```
//! use edaboot::tools::{Catalog, InstallMethod};
//!
//! let catalog = Catalog::builtin();
//! let yosys = catalog.get("yosys").unwrap();
//! assert!(matches!(yosys.method, InstallMethod::Script(_)));
//! assert!(catalog.get("foobar").is_none());
//! ```

pub mod activation;
pub mod catalog;
pub mod detect;
pub mod installer;
pub mod selection;
pub mod version;

pub use activation::{ActivationScript, PersistOutcome};
pub use catalog::{Catalog, InstallMethod, PathEntry, ScriptRecipe, ToolEntry};
pub use detect::{is_package_installed, is_script_installed, resolve_tool_path, RunCommand};
pub use installer::{
    default_context, InstallOutcome, InstallReport, InstallSettings, InstallerContext,
    ReinstallPolicy, ToolFailure, ToolInstaller, ToolStatus,
};
pub use selection::{load_selection, save_selection};
pub use version::{parse_version_output, probe_tool, probe_version, UNKNOWN_VERSION};
