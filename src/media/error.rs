use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failure reported by one of the media collaborators.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("failed to launch transcoder `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("transcoder {operation} failed ({status}): {stderr}")]
    TranscoderFailed {
        operation: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{operation} produced no output at {}", .path.display())]
    MissingOutput {
        operation: &'static str,
        path: PathBuf,
    },

    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
