use crate::core::command::CommandLine;
use crate::engine::error::EngineError;
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, trace};

/// Exit status and captured streams of a finished child process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// The status to propagate as this program's exit code; signal terminations map to 1.
    pub fn exit_code(&self) -> i32 {
        match self.status {
            Some(code) => code,
            None => 1,
        }
    }
}

/// Executes external commands.
///
/// Implemented by [`SystemRunner`] for real child processes; tests substitute a scripted
/// runner so workflows can be exercised without a container runtime.
pub trait ProcessRunner {
    fn run(
        &self,
        command: &CommandLine,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<ProcessOutput, EngineError>> + Send;
}

/// Spawns real child processes through tokio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    async fn run(
        &self,
        command: &CommandLine,
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput, EngineError> {
        debug!("Executing: {}", command);

        let child = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Launch {
                program: command.program().to_string(),
                source,
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let waited = match timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| EngineError::Timeout {
                    command: command.to_string(),
                    seconds: limit.as_secs(),
                })?,
            None => child.wait_with_output().await,
        };

        let output = waited.map_err(|source| EngineError::Launch {
            program: command.program().to_string(),
            source,
        })?;

        let result = ProcessOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        trace!("Process finished with status {:?}", result.status);
        Ok(result)
    }
}
