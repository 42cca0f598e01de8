//! Subprocess execution.
//!
//! Commands are run directly (program plus argv), never through a shell, so
//! tool names from config cannot inject shell syntax.

use crate::error::{EdabootError, Result};
use std::collections::HashMap;
use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: String,

    /// Arguments passed verbatim.
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a spec for a program with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build a spec from an argv prefix plus trailing arguments.
    ///
    /// Returns `None` when the prefix is empty, so a trailing argument is
    /// never run as the program.
    pub fn from_argv<S: AsRef<str>>(prefix: &[S], trailing: &[&str]) -> Option<Self> {
        if prefix.is_empty() {
            return None;
        }
        let mut argv = prefix
            .iter()
            .map(|s| s.as_ref().to_string())
            .chain(trailing.iter().map(|s| s.to_string()));
        let program = argv.next()?;
        Some(Self {
            program,
            args: argv.collect(),
        })
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Whether any argument equals `value`.
    pub fn has_arg(&self, value: &str) -> bool {
        self.args.iter().any(|a| a == value)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal or timed out).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,

    /// Whether the command was killed after exceeding its timeout.
    pub timed_out: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
            timed_out: false,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
            timed_out: false,
        }
    }

    /// Create a result for a command killed at its deadline.
    pub fn timed_out(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: None,
            stdout,
            stderr,
            duration,
            success: false,
            timed_out: true,
        }
    }

    /// Standard output followed by standard error.
    pub fn combined_output(&self) -> String {
        let mut out = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }
        out
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<std::path::PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,

    /// Kill the command after this long. Implies capturing both streams.
    pub timeout: Option<Duration>,
}

impl CommandOptions {
    /// Capture both streams, no timeout.
    pub fn captured() -> Self {
        Self {
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        }
    }

    /// Capture both streams and kill the command after `limit`.
    pub fn with_timeout(limit: Duration) -> Self {
        Self {
            timeout: Some(limit),
            ..Self::captured()
        }
    }
}

/// Output line from command execution.
#[derive(Debug, Clone)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

fn build_command(spec: &CommandSpec, options: &CommandOptions) -> Command {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd
}

fn spawn_failed(spec: &CommandSpec) -> EdabootError {
    EdabootError::CommandFailed {
        command: spec.to_string(),
        code: None,
    }
}

/// Execute a command.
///
/// Returns `Err` only when the program cannot be started; a non-zero exit
/// is reported through [`CommandResult::success`].
pub fn execute(spec: &CommandSpec, options: &CommandOptions) -> Result<CommandResult> {
    if let Some(limit) = options.timeout {
        return execute_with_timeout(spec, options, limit);
    }

    let start = Instant::now();
    let mut cmd = build_command(spec, options);

    if options.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    if options.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    tracing::debug!("Running: {}", spec);
    let output = cmd.output().map_err(|_| spawn_failed(spec))?;

    let duration = start.elapsed();

    let stdout = if options.capture_stdout {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };

    let stderr = if options.capture_stderr {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    Ok(finish(output.status, stdout, stderr, duration))
}

fn finish(status: ExitStatus, stdout: String, stderr: String, duration: Duration) -> CommandResult {
    if status.success() {
        CommandResult::success(stdout, stderr, duration)
    } else {
        CommandResult::failure(status.code(), stdout, stderr, duration)
    }
}

fn spawn_reader<R>(reader: R, tx: Sender<OutputLine>, wrap: fn(String) -> OutputLine)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let reader = BufReader::new(reader);
        for line in reader.lines().map_while(std::result::Result::ok) {
            if tx.send(wrap(line)).is_err() {
                break;
            }
        }
    });
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Execute a command, killing it once `limit` has elapsed.
///
/// Both streams are captured. The reader threads are detached, so a
/// grandchild that keeps a pipe open cannot hold this call past the deadline.
/// A `limit` too large to add to the current instant means no deadline.
pub fn execute_with_timeout(
    spec: &CommandSpec,
    options: &CommandOptions,
    limit: Duration,
) -> Result<CommandResult> {
    let start = Instant::now();
    let deadline = start.checked_add(limit);

    let mut cmd = build_command(spec, options);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!("Running with {:?} timeout: {}", limit, spec);
    let mut child = cmd.spawn().map_err(|_| spawn_failed(spec))?;

    let (tx, rx) = mpsc::channel();
    if let Some(stdout) = child.stdout.take() {
        spawn_reader(stdout, tx.clone(), OutputLine::Stdout);
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_reader(stderr, tx.clone(), OutputLine::Stderr);
    }
    drop(tx);

    let mut stdout = String::new();
    let mut stderr = String::new();

    loop {
        let remaining = deadline.map_or(Duration::MAX, |d| {
            d.saturating_duration_since(Instant::now())
        });
        match rx.recv_timeout(remaining) {
            Ok(OutputLine::Stdout(line)) => {
                stdout.push_str(&line);
                stdout.push('\n');
            }
            Ok(OutputLine::Stderr(line)) => {
                stderr.push_str(&line);
                stderr.push('\n');
            }
            Err(RecvTimeoutError::Timeout) => {
                kill(&mut child);
                tracing::debug!("Timed out after {:?}: {}", limit, spec);
                return Ok(CommandResult::timed_out(stdout, stderr, start.elapsed()));
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    // Both pipes are closed; the process may still be exiting.
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(finish(status, stdout, stderr, start.elapsed())),
            Ok(None) if deadline.map_or(true, |d| Instant::now() < d) => {
                thread::sleep(Duration::from_millis(10))
            }
            Ok(None) => {
                kill(&mut child);
                return Ok(CommandResult::timed_out(stdout, stderr, start.elapsed()));
            }
            Err(_) => {
                kill(&mut child);
                return Err(spawn_failed(spec));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh").args(["-c", script])
    }

    #[test]
    fn spec_display_joins_program_and_args() {
        let spec = CommandSpec::new("sudo").args(["apt", "install", "-y", "gtkwave"]);
        assert_eq!(spec.to_string(), "sudo apt install -y gtkwave");
    }

    #[test]
    fn spec_from_argv_appends_trailing() {
        let prefix = vec!["dpkg".to_string(), "-s".to_string()];
        let spec = CommandSpec::from_argv(&prefix, &["iverilog"]).unwrap();
        assert_eq!(spec.program, "dpkg");
        assert_eq!(spec.args, vec!["-s", "iverilog"]);
        assert!(spec.has_arg("iverilog"));
    }

    #[test]
    fn spec_from_empty_argv_is_none() {
        let prefix: Vec<String> = Vec::new();
        assert!(CommandSpec::from_argv(&prefix, &[]).is_none());
        assert!(CommandSpec::from_argv(&prefix, &["gtkwave"]).is_none());
    }

    #[test]
    fn execute_successful_command() {
        let result = execute(&sh("echo hello"), &CommandOptions::captured()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn execute_failing_command() {
        let result = execute(&sh("exit 3"), &CommandOptions::captured()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert!(!result.timed_out);
    }

    #[test]
    fn execute_missing_program_is_error() {
        let spec = CommandSpec::new("edaboot-definitely-not-a-program");
        let err = execute(&spec, &CommandOptions::captured()).unwrap_err();
        assert!(matches!(err, EdabootError::CommandFailed { code: None, .. }));
    }

    #[test]
    fn execute_with_env() {
        let mut options = CommandOptions::captured();
        options
            .env
            .insert("MY_VAR".to_string(), "my_value".to_string());

        let result = execute(&sh("echo $MY_VAR"), &options).unwrap();

        assert!(result.success);
        assert!(result.stdout.contains("my_value"));
    }

    #[test]
    fn execute_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let options = CommandOptions {
            cwd: Some(temp.path().to_path_buf()),
            ..CommandOptions::captured()
        };

        let result = execute(&CommandSpec::new("pwd"), &options).unwrap();

        assert!(result.success);
    }

    #[test]
    fn timeout_kills_slow_command() {
        let start = Instant::now();
        let result = execute(
            &sh("sleep 5"),
            &CommandOptions::with_timeout(Duration::from_millis(200)),
        )
        .unwrap();

        assert!(result.timed_out);
        assert!(!result.success);
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn unrepresentable_timeout_waits_for_exit() {
        let result = execute(
            &sh("echo ok"),
            &CommandOptions::with_timeout(Duration::from_secs(u64::MAX)),
        )
        .unwrap();

        assert!(result.success);
        assert!(!result.timed_out);
        assert_eq!(result.stdout.trim(), "ok");
    }

    #[test]
    fn timeout_captures_both_streams_of_fast_command() {
        let result = execute(
            &sh("echo out; echo err >&2"),
            &CommandOptions::with_timeout(Duration::from_secs(5)),
        )
        .unwrap();

        assert!(result.success);
        assert!(!result.timed_out);
        assert!(result.stdout.contains("out"));
        assert!(result.stderr.contains("err"));
        let combined = result.combined_output();
        assert!(combined.contains("out") && combined.contains("err"));
    }

    #[test]
    fn timeout_reports_exit_code() {
        let result = execute(
            &sh("exit 2"),
            &CommandOptions::with_timeout(Duration::from_secs(5)),
        )
        .unwrap();

        assert_eq!(result.exit_code, Some(2));
        assert!(!result.timed_out);
    }

    #[test]
    fn combined_output_without_stderr_is_stdout() {
        let result = CommandResult::success("a\n".into(), String::new(), Duration::ZERO);
        assert_eq!(result.combined_output(), "a\n");
    }
}
