use biorun_core::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    /// The containerized tool ran and exited unsuccessfully.
    #[error("{tool} failed with return code {code}")]
    ToolFailed { tool: &'static str, code: i32 },

    #[error("{failed} of {total} file(s) failed")]
    BatchFailed { failed: usize, total: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit status for this error. A failed tool run propagates the tool's own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ToolFailed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failures_propagate_their_exit_code() {
        let err = CliError::ToolFailed {
            tool: "ColabFold",
            code: 137,
        };
        assert_eq!(err.exit_code(), 137);
        assert_eq!(err.to_string(), "ColabFold failed with return code 137");
    }

    #[test]
    fn everything_else_exits_with_one() {
        assert_eq!(CliError::Config("bad".into()).exit_code(), 1);
        assert_eq!(
            CliError::BatchFailed {
                failed: 1,
                total: 3
            }
            .exit_code(),
            1
        );
        let precondition = CliError::from(EngineError::precondition("Docker is not available"));
        assert_eq!(precondition.exit_code(), 1);
        assert_eq!(precondition.to_string(), "Docker is not available");
    }
}
