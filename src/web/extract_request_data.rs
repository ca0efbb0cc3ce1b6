use axum::{
    BoxError,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
};
use futures::{Stream, TryStreamExt};
use std::io;
use std::path::Path;
use tokio::{fs::File, io::AsyncWriteExt, io::BufWriter};
use tokio_util::io::StreamReader;
use tracing::{debug, warn};

use super::error::ApiError;
use crate::storage::{StorageLayout, UploadedFile};

/// Multipart field carrying the upload.
pub const FILE_FIELD: &str = "file";

/// Streams the `file` part of a multipart request into the uploads directory.
///
/// Requests that are not multipart, or carry no `file` part with a filename,
/// are reported as missing input.
pub async fn extract_uploaded_file(
    request: Request,
    layout: &StorageLayout,
) -> Result<UploadedFile, ApiError> {
    let mut multipart = Multipart::from_request(request, &()).await.map_err(|e| {
        debug!("Request is not a usable multipart body: {}", e);
        ApiError::MissingFile
    })?;

    let mut uploaded: Option<UploadedFile> = None;
    let mut ignored_fields = 0;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            // A broken body before the upload was seen means there is nothing to process.
            Err(e) if uploaded.is_none() => {
                debug!("Failed to read multipart field: {}", e);
                return Err(ApiError::MissingFile);
            }
            Err(e) => {
                warn!("Ignoring malformed trailing multipart data: {}", e);
                break;
            }
        };

        let original_name = match (field.name(), field.file_name()) {
            (Some(FILE_FIELD), Some(file_name)) => file_name.to_string(),
            _ => {
                let field_name = field.name().unwrap_or("unnamed").to_string();
                debug!("Ignoring multipart field: {}", field_name);
                ignored_fields += 1;
                continue;
            }
        };

        if uploaded.is_some() {
            warn!(
                "Multiple '{}' fields found in multipart request, keeping the first one",
                FILE_FIELD
            );
            continue;
        }

        let (base_name, stored_path) = layout.allocate_upload();
        debug!(
            "Receiving '{}' into {}",
            original_name,
            stored_path.display()
        );
        stream_to_file(&stored_path, field).await?;

        uploaded = Some(UploadedFile {
            original_name,
            stored_path,
            base_name,
        });
    }

    if ignored_fields > 0 {
        debug!(
            "Ignored {} non-file fields in multipart request",
            ignored_fields
        );
    }

    uploaded.ok_or(ApiError::MissingFile)
}

// Save a `Stream` to a file
async fn stream_to_file<S, E>(path: &Path, stream: S) -> Result<(), ApiError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    let body_with_io_error = stream.map_err(io::Error::other);
    let body_reader = StreamReader::new(body_with_io_error);
    futures::pin_mut!(body_reader);

    let mut file = BufWriter::new(File::create(path).await?);
    tokio::io::copy(&mut body_reader, &mut file).await?;
    file.flush().await?;

    Ok(())
}
