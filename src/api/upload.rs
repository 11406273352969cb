//! Upload API endpoints
//!
//! Handles file uploads for:
//! - POST /files/ - Size of one file, multipart or raw body
//! - POST /uploadfile/ - Name of one multipart file
//! - POST /uploadfiles/ - Names of several multipart files
//!
//! Nothing is written to disk. The request body limit comes from
//! `UploadConfig::max_file_size`.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, FromRequest, Multipart, Request},
    http::header,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState, FieldError};

/// Response for a file size query
#[derive(Debug, Serialize)]
pub struct FileSizeResponse {
    pub file_size: usize,
}

/// Response for a single upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
}

/// Response for multiple uploads
#[derive(Debug, Serialize)]
pub struct MultiUploadResponse {
    pub filenames: Vec<String>,
}

/// A multipart field read into memory
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    /// Name of the uploaded file, required for file fields
    fn require_file_name(self) -> Result<String, ApiError> {
        let field_name = self.field_name;
        self.file_name.ok_or_else(|| {
            ApiError::invalid_fields(vec![FieldError::new(
                vec!["form".into(), field_name.into()],
                "Expected a file upload",
                "file",
            )])
        })
    }
}

/// Build the upload router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/files/", post(create_file))
        .route("/uploadfile/", post(create_upload_file))
        .route("/uploadfiles/", post(create_upload_files))
}

/// POST /files/ - Size of the uploaded bytes
///
/// Accepts multipart/form-data with a field named "file", or any other
/// content type as a raw body.
async fn create_file(request: Request) -> Result<Json<FileSizeResponse>, ApiError> {
    let file_size = if is_multipart(&request) {
        let mut multipart = Multipart::from_request(request, &()).await?;
        read_files(&mut multipart, "file")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::invalid_fields(vec![FieldError::missing("form", "file")]))?
            .data
            .len()
    } else {
        let body = Bytes::from_request(request, &())
            .await
            .map_err(|e| ApiError::from_status(e.status(), e.body_text()))?;
        if body.is_empty() {
            return Err(ApiError::invalid_fields(vec![FieldError::missing("body", "file")]));
        }
        body.len()
    };

    tracing::info!(file_size, "File received");
    Ok(Json(FileSizeResponse { file_size }))
}

/// POST /uploadfile/ - Name of the uploaded file
///
/// Accepts multipart/form-data with a single file field named "file".
async fn create_upload_file(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart?;

    let file = read_files(&mut multipart, "file")
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::invalid_fields(vec![FieldError::missing("form", "file")]))?;

    tracing::info!(
        size = file.data.len(),
        content_type = file.content_type.as_deref().unwrap_or("application/octet-stream"),
        "Upload received"
    );
    let filename = file.require_file_name()?;

    Ok(Json(UploadResponse { filename }))
}

/// POST /uploadfiles/ - Names of every uploaded file
///
/// Accepts multipart/form-data with one or more file fields named "files".
async fn create_upload_files(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MultiUploadResponse>, ApiError> {
    let mut multipart = multipart?;

    let files = read_files(&mut multipart, "files").await?;
    if files.is_empty() {
        return Err(ApiError::invalid_fields(vec![FieldError::missing("form", "files")]));
    }

    let filenames = files
        .into_iter()
        .map(UploadedFile::require_file_name)
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(count = filenames.len(), "Uploads received");
    Ok(Json(MultiUploadResponse { filenames }))
}

/// Read every field with the given name, skipping the rest
async fn read_files(multipart: &mut Multipart, name: &str) -> Result<Vec<UploadedFile>, ApiError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != name {
            continue;
        }

        let file_name = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());
        let data = field.bytes().await?;

        files.push(UploadedFile {
            field_name,
            file_name,
            content_type,
            data,
        });
    }

    Ok(files)
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}
