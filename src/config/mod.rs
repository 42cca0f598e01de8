//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use edaboot::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".edaboot");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "settings:\n  probe_timeout: 10\n").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.settings.probe_timeout, 10);
//! ```
//!
//! # Configuration File Location
//!
//! The project config lives at `.edaboot/config.yml` under the project root.
//! It is optional; `--config <path>` loads a specific file instead.

pub mod loader;
pub mod schema;
pub mod validator;

pub use schema::{
    EdabootConfig, ExtraPathConfig, PackageManagerConfig, Settings, ToolConfig, ToolMethod,
};

pub use loader::{
    find_project_root, load_config, load_config_file, parse_config, project_config_path,
    CONFIG_DIR, CONFIG_FILE,
};

pub use validator::{validate, validate_config, ValidationError};
