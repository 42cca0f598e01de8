//! Error types for edaboot operations.
//!
//! This module defines [`EdabootError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Detection and version probing never produce errors; they degrade to
//!   "not installed" and the unknown-version sentinel
//! - `InstallFailed` is fatal for one tool only; batch installs catch it
//! - Use `anyhow::Error` (via `EdabootError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for edaboot operations.
#[derive(Debug, Error)]
pub enum EdabootError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// The saved tool selection exists but is not a JSON list of names.
    #[error("Failed to read tool selection at {path}: {message}")]
    SelectionParse { path: PathBuf, message: String },

    /// Tool name is in neither the package-manager nor the script table.
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    /// Install command or installer script exited unsuccessfully.
    #[error("Installing '{tool}' failed with exit code {code:?}: {command}")]
    InstallFailed {
        tool: String,
        command: String,
        code: Option<i32>,
    },

    /// Command could not be spawned or waited on.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for edaboot operations.
pub type Result<T> = std::result::Result<T, EdabootError>;
