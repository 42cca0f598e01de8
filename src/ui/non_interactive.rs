//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{EdabootError, Result};

use super::theme::EdabootTheme;
use super::{
    is_affirmative, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface,
};

/// Prefix of environment variables that answer prompts ahead of time.
///
/// `EDABOOT_PROMPT_REINSTALL_YOSYS=yes` answers the prompt keyed
/// `reinstall_yosys`.
pub const PROMPT_ENV_PREFIX: &str = "EDABOOT_PROMPT_";

/// UI used when stdin/stdout is not a terminal or `--non-interactive` is set.
///
/// Prompts never block: they are answered from `EDABOOT_PROMPT_*` variables,
/// then from the prompt's default.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
    theme: EdabootTheme,
}

impl NonInteractiveUI {
    /// Create a UI that reads overrides from the process environment.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();
        Self::with_overrides(mode, env_overrides)
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
            theme: EdabootTheme::plain(),
        }
    }

    fn override_for(&self, key: &str) -> Option<&String> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, key.to_uppercase());
        self.env_overrides.get(&env_key)
    }
}

fn answer(prompt: &Prompt, raw: &str) -> PromptResult {
    match prompt.prompt_type {
        PromptType::Confirm => PromptResult::Bool(is_affirmative(raw)),
        PromptType::MultiSelect { .. } => PromptResult::Strings(
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        ),
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        if let Some(value) = self.override_for(&prompt.key) {
            tracing::debug!("Prompt '{}' answered from environment", prompt.key);
            return Ok(answer(prompt, value));
        }

        if let Some(default) = &prompt.default {
            return Ok(answer(prompt, default));
        }

        Err(EdabootError::ConfigValidationError {
            message: format!(
                "Cannot prompt for '{}' in non-interactive mode (no default value)",
                prompt.key
            ),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(LineSpinner {
            theme: self.theme.clone(),
            quiet: !self.mode.shows_status(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", self.theme.format_header(title));
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  {}", self.theme.format_hint(hint));
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that prints only the final line.
struct LineSpinner {
    theme: EdabootTheme,
    quiet: bool,
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if !self.quiet {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn finish_clear(&mut self) {}
}
