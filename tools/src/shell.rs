//! Subprocess helper: run an argument vector and capture what it printed.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("no command given")]
    EmptyCommand,
    #[error("executable not found: {0}")]
    NotFound(String),
    #[error("command '{command}' timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
    #[error("failed to run '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs `argv[0]` with the remaining arguments. A non-zero exit is a normal
/// result; only a missing executable, a timeout or an I/O failure is an error.
/// The child is killed when the timeout elapses.
pub async fn run_command<S: AsRef<OsStr>>(
    argv: &[S],
    timeout: Option<Duration>,
) -> Result<CommandResult, ShellError> {
    let (program, args) = argv.split_first().ok_or(ShellError::EmptyCommand)?;
    let command = program.as_ref().to_string_lossy().into_owned();
    debug!("running '{}' with {} args", command, args.len());

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| match source.kind() {
            ErrorKind::NotFound => ShellError::NotFound(command.clone()),
            _ => ShellError::Io {
                command: command.clone(),
                source,
            },
        })?;

    let waited = match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| ShellError::Timeout {
                command: command.clone(),
                timeout: limit,
            })?,
        None => child.wait_with_output().await,
    };
    let output = waited.map_err(|source| ShellError::Io { command, source })?;

    Ok(CommandResult {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout() {
        let result = run_command(&["echo", "hello"], None).await.unwrap();

        assert_eq!(result.exit_code, 0);
        assert!(result.success());
        assert_eq!(result.stdout.trim(), "hello");
        assert_eq!(result.stderr, "");
    }

    #[tokio::test]
    async fn non_zero_exit_is_a_result() {
        let result = run_command(&["sh", "-c", "echo oops >&2; exit 1"], None)
            .await
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn times_out() {
        let err = run_command(&["sleep", "5"], Some(Duration::from_millis(100)))
            .await
            .unwrap_err();

        assert!(matches!(err, ShellError::Timeout { .. }));
    }

    #[tokio::test]
    async fn missing_executable() {
        let err = run_command(&["definitely-not-a-real-binary-4821"], None)
            .await
            .unwrap_err();

        assert!(matches!(err, ShellError::NotFound(name) if name == "definitely-not-a-real-binary-4821"));
    }

    #[tokio::test]
    async fn empty_argv() {
        let argv: [&str; 0] = [];
        let err = run_command(&argv, None).await.unwrap_err();

        assert!(matches!(err, ShellError::EmptyCommand));
    }
}
