use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use common::types::SuccessResponse;
use serde::Serialize;
use service::file::upload_store::{UploadStore, UPLOAD_FIELD};
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub image_url: String,
    pub filename: String,
}

fn multipart_error(e: MultipartError) -> JsonApiError {
    JsonApiError::new(e.status(), "Upload Failed", Some(e.body_text()))
}

/// Accept the `image` field of a multipart form. The content type is checked
/// before reading and the size after every chunk, so rejected files are never
/// buffered in full or written to disk.
pub async fn upload_image(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, JsonApiError> {
    let uploads = state.uploads.clone();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let original_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        UploadStore::ensure_image(content_type.as_deref())?;

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            data.extend_from_slice(&chunk);
            uploads.ensure_within_limit(data.len())?;
        }

        let stored = uploads
            .store(original_name.as_deref(), content_type.as_deref(), &data)
            .await?;
        info!(filename = %stored.filename, original = ?original_name, "image uploaded");
        return Ok(Json(UploadResponse {
            success: true,
            image_url: stored.image_url,
            filename: stored.filename,
        }));
    }

    Err(JsonApiError::new(StatusCode::BAD_REQUEST, "No file uploaded", None))
}

pub async fn delete_image(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> Result<Json<SuccessResponse>, JsonApiError> {
    state.uploads.delete(&filename).await?;
    Ok(Json(SuccessResponse::with_message("File deleted")))
}
