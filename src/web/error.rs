// Error types for the API server

use crate::media::ProcessingError;
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

/// Handler-boundary errors. Every variant renders as a fixed plain-text body;
/// processing causes are logged but never sent to the caller.
#[derive(Debug)]
pub enum ApiError {
    MissingFile,
    UnsupportedFileType,
    NotFound,
    Processing(ProcessingError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile | Self::UnsupportedFileType => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingFile => "No file uploaded",
            Self::UnsupportedFileType => "Unsupported file type",
            Self::NotFound => "File not found",
            Self::Processing(_) => "An error occurred while processing your file.",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Processing(err) = &self {
            error!("Error processing upload: {}", err);
        }

        (
            self.status(),
            [(header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref())],
            self.message(),
        )
            .into_response()
    }
}

impl From<ProcessingError> for ApiError {
    fn from(error: ProcessingError) -> Self {
        Self::Processing(error)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(error: std::io::Error) -> Self {
        Self::Processing(ProcessingError::Io(error))
    }
}
