//! Subprocess invocation for the external `snarkos` and `leo` binaries.

use std::path::Path;
use std::process::{Command, ExitStatus, Output, Stdio};

use thiserror::Error;
use tracing::{debug, error};

/// Errors raised while invoking an external binary.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("`{program}` produced non-UTF-8 output")]
    InvalidUtf8 { program: String },
}

/// Captured output of a completed command.
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs toolchain commands synchronously with captured output.
pub struct CommandRunner;

impl CommandRunner {
    /// Runs `program` with `args` in `work_dir` and captures its output.
    ///
    /// A non-zero exit status is an error carrying the command's stderr.
    pub fn run(program: &str, args: &[&str], work_dir: &Path) -> Result<CommandOutput, CommandError> {
        debug!(
            program,
            args = %redact_args(args).join(" "),
            work_dir = %work_dir.display(),
            "running command"
        );
        let output = Command::new(program)
            .args(args)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;
        Self::into_command_output(program, output)
    }

    fn into_command_output(program: &str, output: Output) -> Result<CommandOutput, CommandError> {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            error!(program, status = %output.status, "command failed");
            return Err(CommandError::Failed {
                program: program.to_string(),
                status: output.status,
                stderr,
            });
        }
        let stdout = String::from_utf8(output.stdout).map_err(|_| CommandError::InvalidUtf8 {
            program: program.to_string(),
        })?;
        Ok(CommandOutput { stdout, stderr })
    }
}

/// Private keys passed as CLI arguments must never reach the logs.
pub(crate) fn redact_args(args: &[&str]) -> Vec<String> {
    let mut redacted = Vec::with_capacity(args.len());
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            redacted.push("<redacted>".to_string());
            hide_next = false;
            continue;
        }
        if *arg == "--private-key" {
            hide_next = true;
        }
        redacted.push((*arg).to_string());
    }
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_run_success() {
        let output =
            CommandRunner::run("echo", &["hello"], &PathBuf::from("/tmp")).unwrap();
        assert!(output.stdout.contains("hello"));
    }

    #[test]
    fn test_run_spawn_failure() {
        let result = CommandRunner::run(
            "nonexistent_command_12345",
            &[],
            &PathBuf::from("/tmp"),
        );
        assert!(matches!(result, Err(CommandError::Spawn { .. })));
    }

    #[test]
    fn test_run_nonzero_exit_carries_stderr() {
        let result = CommandRunner::run(
            "sh",
            &["-c", "echo oops >&2; exit 3"],
            &PathBuf::from("/tmp"),
        );
        match result {
            Err(CommandError::Failed { status, stderr, .. }) => {
                assert_eq!(status.code(), Some(3));
                assert!(stderr.contains("oops"));
            }
            other => panic!("expected Failed, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_redact_args_hides_private_key() {
        let redacted = redact_args(&[
            "developer",
            "execute",
            "--private-key",
            "APrivateKey1zkpSecret",
            "--query",
            "http://localhost:3030",
        ]);
        assert!(!redacted.join(" ").contains("APrivateKey1zkpSecret"));
        assert_eq!(redacted[3], "<redacted>");
        assert_eq!(redacted[5], "http://localhost:3030");
    }
}
