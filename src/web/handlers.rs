// API handlers for the web server

use super::{
    AppState,
    error::ApiError,
    extract_request_data::extract_uploaded_file,
    models::{DownloadQuery, UploadResponse},
};
use crate::media::{MediaKind, generate_derivatives};
use crate::models::DerivativeRecord;
use crate::storage::UploadedFile;
use axum::{
    Json,
    body::Body,
    extract::{Query, Request, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, info};

// --- POST /upload ---
// Stores the `file` part, generates its derivatives and returns the record
pub async fn upload(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<UploadResponse>, ApiError> {
    let uploaded = extract_uploaded_file(request, &state.layout).await?;
    info!(
        "Upload received: original_name={}, stored_path={}",
        uploaded.original_name,
        uploaded.stored_path.display()
    );

    // Processing runs in its own task so a client disconnect does not cancel it.
    let record = tokio::spawn(process_upload(state, uploaded))
        .await
        .map_err(|e| ApiError::Processing(e.into()))??;

    Ok(Json(UploadResponse::from(record)))
}

async fn process_upload(
    state: AppState,
    uploaded: UploadedFile,
) -> Result<DerivativeRecord, ApiError> {
    // The stored original is kept even when the type is rejected.
    let kind = uploaded
        .extension()
        .as_deref()
        .and_then(MediaKind::from_extension)
        .ok_or(ApiError::UnsupportedFileType)?;
    debug!("Classified {} as {:?}", uploaded.base_name, kind);

    let record = generate_derivatives(
        kind,
        &uploaded,
        &state.layout,
        state.transcoder.as_ref(),
        state.resizer.as_ref(),
    )
    .await?;
    debug_assert!(record.is_video() != record.is_image());

    // Stands in for persisting the record.
    info!("Saved record: {:?}", record);

    Ok(record)
}

// --- GET /download?path=... ---
// Streams the file at the literal given path. No access control or containment check is applied.
pub async fn download(
    query: Result<Query<DownloadQuery>, QueryRejection>,
    request: Request,
) -> Result<Response, ApiError> {
    // An unusable query string is treated like a missing path.
    let Ok(Query(query)) = query else {
        return Err(ApiError::NotFound);
    };
    let path = query.path.filter(|p| !p.is_empty()).ok_or(ApiError::NotFound)?;

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        _ => {
            debug!("Download requested for missing file: {}", path);
            return Err(ApiError::NotFound);
        }
    }

    debug!("Serving file: {}", path);
    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    Ok(response.map(Body::new).into_response())
}
