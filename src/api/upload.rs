use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use super::{ApiError, AppState};
use crate::uploads::UploadStore;

/// Multipart field that carries the file.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

pub(super) fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/api/upload",
        post(upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}

/// Store the `file` part and answer with its public URL. Other parts are skipped.
async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await?;
        let filename = state
            .uploads
            .save(original_name.as_deref(), &bytes)
            .await
            .map_err(ApiError::Upload)?;

        return Ok(Json(UploadResponse {
            url: UploadStore::url_for(&filename),
        }));
    }

    Err(ApiError::MissingFile)
}
