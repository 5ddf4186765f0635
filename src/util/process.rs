//! Subprocess execution utilities.
//!
//! Commands are shell strings run in the project directory. Combined
//! stdout/stderr is streamed line by line to the console and captured.
//!
//! A command containing a pipeline is split into stages that are chained
//! through OS pipes, and success is decided by the FIRST stage: later stages
//! are only there to filter or log the producer's output.

use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use anyhow::Result;
use thiserror::Error;

/// How a command failure is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Turn a failure into an error that aborts the run
    pub exit_on_failure: bool,
    /// Capture output without echoing it
    pub hide_output: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            exit_on_failure: true,
            hide_output: false,
        }
    }
}

impl RunOptions {
    /// Return failures to the caller instead of aborting.
    pub fn allow_failure(mut self) -> Self {
        self.exit_on_failure = false;
        self
    }

    /// Do not echo output.
    pub fn hide_output(mut self) -> Self {
        self.hide_output = true;
        self
    }
}

/// Result of running a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code of the deciding stage (`None` if it never ran or was killed)
    pub code: Option<i32>,
    /// Captured output lines, without line terminators
    pub lines: Vec<String>,
    /// Whether the deciding stage exited with 0
    pub success: bool,
}

impl CommandOutput {
    /// Successful output with the given lines.
    pub fn success(lines: Vec<String>) -> Self {
        CommandOutput {
            code: Some(0),
            lines,
            success: true,
        }
    }

    /// Failed output with the given exit code.
    pub fn failure(code: i32, lines: Vec<String>) -> Self {
        CommandOutput {
            code: Some(code),
            lines,
            success: false,
        }
    }

    /// Sentinel for a command that could not be executed at all.
    pub fn spawn_failure() -> Self {
        CommandOutput {
            code: None,
            lines: Vec::new(),
            success: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("`{command}` returned {}", display_code(*code))]
    Failed { command: String, code: Option<i32> },

    #[error("error executing `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

fn display_code(code: Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "no exit code".to_string(),
    }
}

/// Executes shell command strings.
pub trait CommandRunner {
    /// Run `command`. With `exit_on_failure` set, a failed or unspawnable
    /// command is returned as an error.
    fn run(&mut self, command: &str, options: RunOptions) -> Result<CommandOutput>;
}

/// Runs commands through the system shell.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    cwd: PathBuf,
}

impl ShellRunner {
    /// Create a runner executing in `cwd`.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        ShellRunner {
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    /// Get the working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    fn execute(&self, command: &str, hide_output: bool) -> io::Result<CommandOutput> {
        let stages = split_pipeline(command);
        let (reader, writer) = io::pipe()?;

        let mut children: Vec<Child> = Vec::with_capacity(stages.len());
        let mut upstream: Option<ChildStdout> = None;

        for (i, stage) in stages.iter().enumerate() {
            let mut cmd = shell_command(stage);
            cmd.current_dir(&self.cwd);

            if let Some(stdout) = upstream.take() {
                cmd.stdin(Stdio::from(stdout));
            }

            let spawned = writer.try_clone().and_then(|stderr| {
                cmd.stderr(stderr);
                if i + 1 == stages.len() {
                    cmd.stdout(writer.try_clone()?);
                } else {
                    cmd.stdout(Stdio::piped());
                }
                cmd.spawn()
            });

            match spawned {
                Ok(mut child) => {
                    upstream = child.stdout.take();
                    children.push(child);
                }
                Err(err) => {
                    for mut child in children {
                        let _ = child.kill();
                        let _ = child.wait();
                    }
                    return Err(err);
                }
            }
        }

        // Only the children may hold the write end now, so EOF arrives when they exit.
        drop(writer);

        let mut lines = Vec::new();
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']).to_string();
            if !hide_output {
                println!("{}", line);
            }
            lines.push(line);
        }

        let mut statuses = Vec::with_capacity(children.len());
        for child in &mut children {
            statuses.push(child.wait()?);
        }

        let first = statuses
            .first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;

        Ok(CommandOutput {
            code: first.code(),
            lines,
            success: first.success(),
        })
    }
}

impl CommandRunner for ShellRunner {
    fn run(&mut self, command: &str, options: RunOptions) -> Result<CommandOutput> {
        tracing::debug!("running `{}`", command);

        match self.execute(command, options.hide_output) {
            Ok(output) => {
                if !output.success && options.exit_on_failure {
                    return Err(CommandError::Failed {
                        command: command.to_string(),
                        code: output.code,
                    }
                    .into());
                }
                Ok(output)
            }
            Err(source) => {
                tracing::error!("error executing `{}`: {}", command, source);
                if options.exit_on_failure {
                    return Err(CommandError::Spawn {
                        command: command.to_string(),
                        source,
                    }
                    .into());
                }
                Ok(CommandOutput::spawn_failure())
            }
        }
    }
}

#[cfg(windows)]
fn shell_command(script: &str) -> Command {
    use std::os::windows::process::CommandExt;

    // cmd parses the raw command line itself; `arg` would escape embedded
    // quotes as `\"`. With /S the outer pair is stripped and the rest is
    // kept verbatim.
    let mut cmd = Command::new("cmd");
    cmd.args(["/S", "/C"]).raw_arg(format!("\"{}\"", script));
    cmd
}

#[cfg(not(windows))]
fn shell_command(script: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(script);
    cmd
}

/// Split a command on pipeline bars outside quotes. `||` is kept intact and
/// a backslash outside single quotes escapes the next character.
pub fn split_pipeline(command: &str) -> Vec<String> {
    let chars: Vec<char> = command.chars().collect();
    let mut stages = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match quote {
            Some('\'') if c == '\'' => quote = None,
            Some('\'') => {}
            _ if c == '\\' => {
                current.push(c);
                if let Some(&next) = chars.get(i + 1) {
                    current.push(next);
                }
                i += 2;
                continue;
            }
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '|' => {
                if chars.get(i + 1) == Some(&'|') {
                    current.push_str("||");
                    i += 2;
                    continue;
                }
                stages.push(std::mem::take(&mut current));
                i += 1;
                continue;
            }
            None => {}
        }
        current.push(c);
        i += 1;
    }
    stages.push(current);

    let stages: Vec<String> = stages
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if stages.is_empty() {
        vec![command.trim().to_string()]
    } else {
        stages
    }
}

/// Quote a path or argument for the host shell's command string.
pub fn shell_quote(arg: impl AsRef<str>) -> String {
    if cfg!(windows) {
        quote_cmd(arg.as_ref())
    } else {
        quote_posix(arg.as_ref())
    }
}

/// `sh` quoting: anything beyond a plain word goes in single quotes, where
/// nothing expands. A `'` is written as `'\''`.
fn quote_posix(arg: &str) -> String {
    let plain = |c: char| c.is_ascii_alphanumeric() || "_./=:-".contains(c);
    if !arg.is_empty() && arg.chars().all(plain) {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', "'\\''"))
}

/// `cmd` quoting. Windows paths cannot contain `"`, and `&|<>()^` are
/// literal inside double quotes.
fn quote_cmd(arg: &str) -> String {
    let special = |c: char| c.is_whitespace() || "&|<>()^,;=\"".contains(c);
    if !arg.is_empty() && !arg.contains(special) {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('"', ""))
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
