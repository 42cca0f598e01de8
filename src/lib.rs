//! edaboot - Install and bootstrap an open-source EDA toolchain.
//!
//! edaboot installs digital-design tools (simulators, synthesis, place and
//! route, waveform viewers) either through the system package manager or
//! through per-tool installer scripts, and puts script-installed tools on
//! `PATH` by appending to the project's activation script.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`shell`] - Subprocess execution and platform detection
//! - [`tools`] - Tool catalog, detection, version probing and installation
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use edaboot::tools::{parse_version_output, UNKNOWN_VERSION};
//!
//! let output = "Icarus Verilog version 12.0 (stable)\n";
//! let version = parse_version_output(output, Some("Icarus Verilog version"));
//! assert_eq!(version, "Icarus Verilog version 12.0 (stable)");
//! assert_eq!(parse_version_output("", None), UNKNOWN_VERSION);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod shell;
pub mod tools;
pub mod ui;

pub use error::{EdabootError, Result};
