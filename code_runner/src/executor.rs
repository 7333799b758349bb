//! Child-process execution with a wall-clock budget.
//!
//! [`handle_process`] spawns a command, feeds it stdin, and collects stdout,
//! stderr and the exit status. When the budget runs out the child is killed,
//! stdout is dropped and stderr is replaced with [`TIME_LIMIT_MARKER`].

use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStdin, Command};
use tokio::time::timeout;
use tracing::debug;

use crate::error::RunnerError;

/// Synthetic stderr reported for a run that exceeded its time budget.
pub const TIME_LIMIT_MARKER: &str = "TLEError: Time limit exceeded";

/// Captured outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or the negated signal number when the process was killed
    /// by a signal. Unspecified for timed-out runs.
    pub exit_status: i32,
}

impl ExecutionResult {
    pub fn timed_out(&self) -> bool {
        self.stdout.is_empty() && self.stderr == TIME_LIMIT_MARKER
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .unwrap_or_else(|| -status.signal().unwrap_or(0))
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

async fn read_all<R: AsyncRead + Unpin>(reader: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        reader.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

async fn feed_stdin(stdin: Option<ChildStdin>, input: &[u8]) -> std::io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(input).await {
        // The program is free to exit without reading its input.
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
    // stdin is dropped here so the child sees EOF.
}

/// Runs `command` (program followed by its arguments), writing `input` to its
/// stdin and waiting at most `limit` for it to finish.
pub async fn handle_process(
    command: &[String],
    input: Option<&str>,
    limit: Duration,
) -> Result<ExecutionResult, RunnerError> {
    let (program, args) = command.split_first().ok_or(RunnerError::EmptyCommand)?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| RunnerError::Spawn {
            program: program.clone(),
            source,
        })?;

    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let input = input.unwrap_or_default().as_bytes();

    let outcome = timeout(limit, async {
        let (status, out, err, fed) = tokio::join!(
            child.wait(),
            read_all(stdout),
            read_all(stderr),
            feed_stdin(stdin, input),
        );
        if let Err(e) = fed {
            debug!("stdin of '{}' not fully written: {}", program, e);
        }
        Ok::<_, std::io::Error>((status?, out?, err?))
    })
    .await;

    match outcome {
        Ok(result) => {
            let (status, out, err) = result?;
            Ok(ExecutionResult {
                stdout: String::from_utf8_lossy(&out).into_owned(),
                stderr: String::from_utf8_lossy(&err).into_owned(),
                exit_status: exit_code(status),
            })
        }
        Err(_) => {
            debug!("'{}' exceeded {:?}, killing", program, limit);
            if let Err(e) = child.kill().await {
                debug!("kill after timeout failed: {}", e);
            }
            let status = child.wait().await?;
            Ok(ExecutionResult {
                stdout: String::new(),
                stderr: TIME_LIMIT_MARKER.to_string(),
                exit_status: exit_code(status),
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn captures_stdout_stderr_and_status() {
        let result = handle_process(
            &sh("echo out; echo err 1>&2; exit 3"),
            None,
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
        assert_eq!(result.exit_status, 3);
        assert!(!result.timed_out());
    }

    #[tokio::test]
    async fn feeds_stdin() {
        let result = handle_process(&sh("cat"), Some("hello\nworld\n"), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(result.stdout, "hello\nworld\n");
        assert_eq!(result.exit_status, 0);
    }

    #[tokio::test]
    async fn ignores_unread_stdin() {
        let big = "x".repeat(1 << 20);
        let result = handle_process(&sh("exit 0"), Some(&big), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(result.exit_status, 0);
    }

    #[tokio::test]
    async fn timeout_discards_output_and_sets_marker() {
        let result = handle_process(
            &sh("echo partial; sleep 10"),
            None,
            Duration::from_millis(200),
        )
        .await
        .unwrap();
        assert_eq!(result.stdout, "");
        assert_eq!(result.stderr, TIME_LIMIT_MARKER);
        assert!(result.timed_out());
    }

    #[tokio::test]
    async fn empty_command_is_rejected() {
        let err = handle_process(&[], None, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, RunnerError::EmptyCommand));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let err = handle_process(
            &["definitely-not-a-real-binary-4242".to_string()],
            None,
            Duration::from_secs(1),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
    }
}
