use crate::core::mount::PathResolutionError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The environment is not ready: runtime, image, database or input missing.
    #[error("{0}")]
    Precondition(String),

    #[error(transparent)]
    PathResolution(#[from] PathResolutionError),

    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Command '{command}' timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    #[error("Container operation '{operation}' failed: {message}")]
    Container {
        operation: &'static str,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl EngineError {
    pub fn precondition(message: impl Into<String>) -> Self {
        EngineError::Precondition(message.into())
    }
}
