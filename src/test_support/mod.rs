//! Test utilities for unit tests.
//!
//! `RecordingRunner` stands in for the shell: it records every command,
//! answers with scripted outputs and can run a side effect for a matched
//! command (e.g. creating the directory a `git clone` would have created).
//!
//! # Example
//!
//! ```rust,ignore
//! let mut runner = RecordingRunner::new();
//! runner.expect_prefix("git clone", CommandOutput::success(vec![]));
//! ensure_vcpkg(&ctx, &mut runner)?;
//! assert!(runner.was_called_with("git clone"));
//! ```

pub mod fixtures;

use anyhow::{bail, Result};

use crate::util::process::{CommandError, CommandOutput, CommandRunner, RunOptions};

// Re-export fixtures for convenience
pub use fixtures::*;

/// Side effect run when an expectation matches.
pub type Effect = Box<dyn FnMut()>;

/// Pattern for matching commands in RecordingRunner.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Any => true,
        }
    }
}

/// Expectation for a command execution.
pub struct CommandExpectation {
    /// Pattern to match against commands.
    pub pattern: CommandPattern,
    /// Output to return when matched.
    pub output: CommandOutput,
    /// Number of times this expectation can be used (None = unlimited).
    pub times: Option<usize>,
    /// Number of times this expectation has been used.
    pub used: usize,
    effect: Option<Effect>,
}

impl CommandExpectation {
    /// Create a new expectation.
    pub fn new(pattern: CommandPattern, output: CommandOutput) -> Self {
        CommandExpectation {
            pattern,
            output,
            times: None,
            used: 0,
            effect: None,
        }
    }

    /// Set the number of times this expectation can be used.
    pub fn times(mut self, n: usize) -> Self {
        self.times = Some(n);
        self
    }

    /// Run `effect` every time this expectation matches.
    pub fn with_effect(mut self, effect: impl FnMut() + 'static) -> Self {
        self.effect = Some(Box::new(effect));
        self
    }

    /// Check if this expectation can still be used.
    pub fn available(&self) -> bool {
        match self.times {
            Some(n) => self.used < n,
            None => true,
        }
    }
}

/// Command runner that records calls instead of spawning processes.
#[derive(Default)]
pub struct RecordingRunner {
    expectations: Vec<CommandExpectation>,
    calls: Vec<String>,
    default_output: Option<CommandOutput>,
}

impl RecordingRunner {
    /// Create a new recording runner.
    pub fn new() -> Self {
        RecordingRunner::default()
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&mut self, prefix: &str, output: CommandOutput) -> &mut Self {
        self.expectations.push(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            output,
        ));
        self
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&mut self, substring: &str, output: CommandOutput) -> &mut Self {
        self.expectations.push(CommandExpectation::new(
            CommandPattern::Contains(substring.to_string()),
            output,
        ));
        self
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&mut self, expectation: CommandExpectation) -> &mut Self {
        self.expectations.push(expectation);
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&mut self, output: CommandOutput) -> &mut Self {
        self.default_output = Some(output);
        self
    }

    /// Get all commands that were called.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Whether any recorded command contains `needle`.
    pub fn was_called_with(&self, needle: &str) -> bool {
        self.calls.iter().any(|c| c.contains(needle))
    }

    /// Verify that all expectations with a specific count were satisfied.
    pub fn verify(&self) -> Result<()> {
        for (i, exp) in self.expectations.iter().enumerate() {
            if let Some(expected) = exp.times {
                if exp.used != expected {
                    bail!(
                        "expectation {} was used {} times, expected {}",
                        i,
                        exp.used,
                        expected
                    );
                }
            }
        }
        Ok(())
    }

    fn lookup(&mut self, command: &str) -> Result<CommandOutput> {
        for exp in &mut self.expectations {
            if exp.pattern.matches(command) && exp.available() {
                exp.used += 1;
                if let Some(effect) = exp.effect.as_mut() {
                    effect();
                }
                return Ok(exp.output.clone());
            }
        }

        if let Some(ref default) = self.default_output {
            return Ok(default.clone());
        }

        bail!("unexpected command: {}", command)
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, command: &str, options: RunOptions) -> Result<CommandOutput> {
        self.calls.push(command.to_string());

        let output = self.lookup(command)?;
        if !output.success && options.exit_on_failure {
            return Err(CommandError::Failed {
                command: command.to_string(),
                code: output.code,
            }
            .into());
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_recording_runner_records_calls() {
        let mut runner = RecordingRunner::new();
        runner.expect_prefix("git", CommandOutput::success(vec!["ok".to_string()]));

        let output = runner.run("git --version", RunOptions::default()).unwrap();
        assert_eq!(output.lines, vec!["ok"]);
        assert_eq!(runner.calls(), &["git --version".to_string()]);
        assert!(runner.was_called_with("--version"));
    }

    #[test]
    fn test_recording_runner_unexpected_command() {
        let mut runner = RecordingRunner::new();
        assert!(runner.run("rm -rf /", RunOptions::default()).is_err());
    }

    #[test]
    fn test_recording_runner_failure_policy() {
        let mut runner = RecordingRunner::new();
        runner.set_default(CommandOutput::failure(1, Vec::new()));

        assert!(runner.run("vcpkg install cairo", RunOptions::default()).is_err());
        let output = runner
            .run("vcpkg install cairo", RunOptions::default().allow_failure())
            .unwrap();
        assert_eq!(output.code, Some(1));
    }

    #[test]
    fn test_recording_runner_effect_and_times() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();

        let mut runner = RecordingRunner::new();
        runner.expect_pattern(
            CommandExpectation::new(CommandPattern::Any, CommandOutput::success(Vec::new()))
                .times(1)
                .with_effect(move || counter.set(counter.get() + 1)),
        );

        runner.run("anything", RunOptions::default()).unwrap();
        assert_eq!(hits.get(), 1);
        assert!(runner.verify().is_ok());
        assert!(runner.run("again", RunOptions::default()).is_err());
    }
}
