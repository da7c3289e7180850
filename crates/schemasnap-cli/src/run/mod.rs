mod logging;
mod pipeline;
mod writer;

pub use logging::{LogFormat, init_logging};
pub use pipeline::{PipelineError, RunSettings, execute};
pub use writer::{FsArtifactWriter, write_bytes_atomic};

use thiserror::Error;

/// Errors raised by the run machinery around the core pipeline.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("render task failed: {0}")]
    Task(String),
}

/// Result type for run operations.
pub type RunResult<T> = std::result::Result<T, RunError>;
