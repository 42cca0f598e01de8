//! Configuration validation rules.
//!
//! - Package manager argv prefixes must not be empty
//! - The probe timeout must be positive and at most an hour
//! - Tools that are not built in must declare a method
//! - Script tools must have an installer script

use crate::config::schema::{EdabootConfig, ToolMethod, MAX_PROBE_TIMEOUT_SECS};
use crate::error::{EdabootError, Result};
use crate::tools::catalog;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Tool name if error is tool-specific
    pub tool: Option<String>,
}

impl ValidationError {
    fn global(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
            tool: None,
        }
    }

    fn for_tool(rule: &str, tool: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
            tool: Some(tool.to_string()),
        }
    }
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &EdabootConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.package_manager.install.is_empty() {
        errors.push(ValidationError::global(
            "empty-command",
            "package_manager.install must not be empty",
        ));
    }
    if config.package_manager.query.is_empty() {
        errors.push(ValidationError::global(
            "empty-command",
            "package_manager.query must not be empty",
        ));
    }
    if config.settings.probe_timeout == 0 {
        errors.push(ValidationError::global(
            "zero-timeout",
            "settings.probe_timeout must be greater than zero",
        ));
    }
    if config.settings.probe_timeout > MAX_PROBE_TIMEOUT_SECS {
        errors.push(ValidationError::global(
            "timeout-too-large",
            format!(
                "settings.probe_timeout must be at most {} seconds",
                MAX_PROBE_TIMEOUT_SECS
            ),
        ));
    }

    errors.extend(validate_tools(config));
    errors
}

fn validate_tools(config: &EdabootConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (name, tool) in &config.tools {
        let builtin = catalog::builtin_method(name);

        let method = match (tool.method, builtin) {
            (Some(method), _) => method,
            (None, Some(method)) => method,
            (None, None) => {
                errors.push(ValidationError::for_tool(
                    "missing-method",
                    name,
                    format!("Tool '{}' is not built in and must set 'method'", name),
                ));
                continue;
            }
        };

        // Built-in script tools fall back to their recipe path
        if method == ToolMethod::Script
            && tool.script.is_none()
            && builtin != Some(ToolMethod::Script)
        {
            errors.push(ValidationError::for_tool(
                "missing-script",
                name,
                format!("Script tool '{}' must set 'script'", name),
            ));
        }

        if method == ToolMethod::Package
            && (tool.script.is_some() || tool.bin_dir.is_some() || !tool.extra_paths.is_empty())
        {
            errors.push(ValidationError::for_tool(
                "script-fields-on-package",
                name,
                format!(
                    "Tool '{}' is installed by the package manager; 'script', 'bin_dir' and \
                     'extra_paths' only apply to script tools",
                    name
                ),
            ));
        }
    }

    errors
}

/// Validate and fail with every problem joined into one message.
pub fn validate(config: &EdabootConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(EdabootError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
