//! External program invocation.
//!
//! Every external tool (`xmllint`, `ducktype`, `git`, `xsltproc`, hook
//! scripts) is run through a [`ProcessRunner`], so tests can substitute a
//! recording fake for the real binaries.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::SiteError;

/// What to do with a child's standard output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Pass through to our stdout.
    #[default]
    Inherit,
    /// Collect into [`CommandOutput::stdout`].
    Capture,
    /// Discard.
    Discard,
}

/// A synchronous external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Extra environment variables, added to the inherited environment.
    pub env: Vec<(String, String)>,
    pub output: OutputMode,
}

impl ExternalCommand {
    /// Create a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument.
    #[must_use]
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run in `dir`.
    #[must_use]
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add environment variables.
    #[must_use]
    pub fn envs(mut self, env: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env.extend(env);
        self
    }

    /// Capture standard output.
    #[must_use]
    pub fn capture(mut self) -> Self {
        self.output = OutputMode::Capture;
        self
    }

    /// Silence standard output.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.output = OutputMode::Discard;
        self
    }

    /// Value following `-o` in the argument list, if any.
    pub fn output_path(&self) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == "-o")
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

/// Result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    /// Captured stdout; empty unless [`OutputMode::Capture`] was requested.
    pub stdout: String,
}

impl CommandOutput {
    /// A successful result with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
        }
    }

    /// A failed result with the given exit code.
    pub fn failed(code: i32) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
        }
    }
}

/// Runs external commands.
pub trait ProcessRunner {
    /// Run a command to completion.
    ///
    /// A non-zero exit is reported through [`CommandOutput::success`], not
    /// as an error.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Process`] if the program cannot be started.
    fn run(&self, command: &ExternalCommand) -> Result<CommandOutput, SiteError>;
}

/// Runs commands with [`std::process::Command`]. Stderr is inherited.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &ExternalCommand) -> Result<CommandOutput, SiteError> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stderr(Stdio::inherit());
        if let Some(cwd) = &command.cwd {
            cmd.current_dir(cwd);
        }
        cmd.stdout(match command.output {
            OutputMode::Inherit => Stdio::inherit(),
            OutputMode::Capture => Stdio::piped(),
            OutputMode::Discard => Stdio::null(),
        });

        let output = cmd.output().map_err(|source| SiteError::Process {
            program: command.program.clone(),
            source,
        })?;
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_arguments() {
        let cmd = ExternalCommand::new("xmllint")
            .arg("--xinclude")
            .args(["-o", "/stage/index.page"])
            .path_arg(Path::new("/src/index.page"))
            .cwd("/src");
        assert_eq!(cmd.program, "xmllint");
        assert_eq!(
            cmd.args,
            vec!["--xinclude", "-o", "/stage/index.page", "/src/index.page"]
        );
        assert_eq!(cmd.output_path(), Some("/stage/index.page"));
        assert_eq!(cmd.cwd.as_deref(), Some(Path::new("/src")));
    }

    #[test]
    fn test_output_path_absent() {
        assert_eq!(ExternalCommand::new("git").arg("pull").output_path(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_stdout() {
        let out = SystemRunner
            .run(&ExternalCommand::new("sh").args(["-c", "echo hello"]).capture())
            .unwrap();
        assert!(out.success);
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_code() {
        let out = SystemRunner
            .run(&ExternalCommand::new("sh").args(["-c", "exit 3"]))
            .unwrap();
        assert!(!out.success);
        assert_eq!(out.code, Some(3));
    }

    #[test]
    fn test_system_runner_spawn_failure() {
        let err = SystemRunner
            .run(&ExternalCommand::new("pintail-no-such-program"))
            .unwrap_err();
        assert!(matches!(err, SiteError::Process { .. }));
    }
}
