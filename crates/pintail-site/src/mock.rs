//! Mock process runner for testing.
//!
//! Provides [`MockRunner`], which records every command instead of running
//! it. `xmllint` is emulated by copying its input to the `-o` path so that
//! staging works without the real tool; other programs succeed with empty
//! output unless a handler is installed.
//!
//! # Example
//!
//! ```ignore
//! use pintail_site::{CommandOutput, MockRunner};
//!
//! let runner = MockRunner::new()
//!     .with_handler("git", |_| CommandOutput::failed(128));
//! let calls = runner.calls();
//! // ... build a Site with Box::new(runner) ...
//! assert_eq!(calls.count("git"), 1);
//! ```

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::process::{CommandOutput, ExternalCommand, ProcessRunner};
use crate::SiteError;

type Handler = Box<dyn Fn(&ExternalCommand) -> CommandOutput>;

/// Shared view of the commands a [`MockRunner`] received.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<ExternalCommand>>>);

impl CallLog {
    /// All recorded commands in order.
    pub fn commands(&self) -> Vec<ExternalCommand> {
        self.0.borrow().clone()
    }

    /// Number of recorded invocations of `program`.
    pub fn count(&self, program: &str) -> usize {
        self.0.borrow().iter().filter(|c| c.program == program).count()
    }

    /// Recorded invocations of `program` whose first argument is `first`.
    pub fn with_first_arg(&self, program: &str, first: &str) -> Vec<ExternalCommand> {
        self.0
            .borrow()
            .iter()
            .filter(|c| c.program == program && c.args.first().is_some_and(|a| a == first))
            .cloned()
            .collect()
    }
}

/// Process runner that records commands instead of executing them.
pub struct MockRunner {
    calls: CallLog,
    handlers: Vec<(String, Handler)>,
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRunner {
    /// Create a runner with the built-in `xmllint` emulation.
    pub fn new() -> Self {
        Self {
            calls: CallLog::default(),
            handlers: Vec::new(),
        }
        .with_handler("xmllint", copy_input_to_output)
    }

    /// Install a handler for `program`, replacing any earlier one.
    #[must_use]
    pub fn with_handler(
        mut self,
        program: &str,
        handler: impl Fn(&ExternalCommand) -> CommandOutput + 'static,
    ) -> Self {
        self.handlers.retain(|(p, _)| p != program);
        self.handlers.push((program.to_owned(), Box::new(handler)));
        self
    }

    /// Handle for inspecting recorded commands after the runner is moved.
    pub fn calls(&self) -> CallLog {
        CallLog(Rc::clone(&self.calls.0))
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, command: &ExternalCommand) -> Result<CommandOutput, SiteError> {
        self.calls.0.borrow_mut().push(command.clone());
        let output = self
            .handlers
            .iter()
            .find(|(p, _)| *p == command.program)
            .map_or_else(|| CommandOutput::ok(""), |(_, h)| h(command));
        Ok(output)
    }
}

/// Copy the last argument to the `-o` path, like a no-op `xmllint`.
pub fn copy_input_to_output(command: &ExternalCommand) -> CommandOutput {
    let (Some(output), Some(input)) = (command.output_path(), command.args.last()) else {
        return CommandOutput::failed(1);
    };
    let output = Path::new(output);
    if let Some(parent) = output.parent()
        && std::fs::create_dir_all(parent).is_err()
    {
        return CommandOutput::failed(1);
    }
    match std::fs::copy(input, output) {
        Ok(_) => CommandOutput::ok(""),
        Err(_) => CommandOutput::failed(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_and_defaults_to_success() {
        let runner = MockRunner::new();
        let calls = runner.calls();
        let out = runner
            .run(&ExternalCommand::new("git").args(["pull", "-q"]))
            .unwrap();
        assert!(out.success);
        assert_eq!(calls.count("git"), 1);
        assert_eq!(calls.with_first_arg("git", "pull").len(), 1);
        assert!(calls.with_first_arg("git", "clone").is_empty());
    }

    #[test]
    fn test_handler_overrides_default() {
        let runner = MockRunner::new().with_handler("git", |_| CommandOutput::failed(128));
        let out = runner.run(&ExternalCommand::new("git")).unwrap();
        assert!(!out.success);
        assert_eq!(out.code, Some(128));
    }

    #[test]
    fn test_xmllint_copies_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.page");
        let output = dir.path().join("stage/out.page");
        std::fs::write(&input, "<page/>").unwrap();

        let runner = MockRunner::new();
        let out = runner
            .run(
                &ExternalCommand::new("xmllint")
                    .arg("--xinclude")
                    .arg("-o")
                    .path_arg(&output)
                    .path_arg(&input),
            )
            .unwrap();
        assert!(out.success);
        assert_eq!(std::fs::read_to_string(output).unwrap(), "<page/>");
    }
}
