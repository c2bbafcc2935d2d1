//! Import API Handlers
//!
//! `POST /api/import-text` takes a pasted blob, `POST /api/upload-files` takes
//! one or more files. Both respond with plain text meant for display.

use std::fmt::Display;

use axum::{
    Form,
    extract::{FromRequest, Multipart, Query, Request, State, multipart::MultipartRejection},
    http::{StatusCode, header::CONTENT_TYPE},
};
use serde::Deserialize;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::import::{self as import_service, ImportError, UploadedFile};

/// Form field carrying pasted log text
pub const LOG_TEXT_FIELD: &str = "logText";

/// Multipart field name shared by all uploaded files
pub const FILES_FIELD: &str = "files";

#[derive(Debug, Deserialize)]
pub struct ImportTextForm {
    #[serde(rename = "logText")]
    pub log_text: Option<String>,
}

/// POST /api/import-text
/// Import pasted log text whose first line declares the service name
pub async fn import_text(State(state): State<AppState>, request: Request) -> ApiResult<String> {
    let log_text = read_log_text(request, state.upload_limit).await?;

    if log_text.is_empty() {
        return Err(ApiError::BadRequest("No log text provided".to_string()));
    }

    let summary = import_service::import_text(state.sink.as_ref(), &log_text)
        .await
        .map_err(|e| match e {
            ImportError::Invalid(err) => ApiError::BadRequest(err.to_string()),
            err @ ImportError::Push(_) => ApiError::InternalError(err.to_string()),
        })?;

    Ok(summary.to_string())
}

/// POST /api/upload-files
/// Import every uploaded file as its own batch and report per-file outcomes
pub async fn upload_files(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<String> {
    let limit = state.upload_limit;
    let mut multipart = multipart.map_err(|e| form_error(e.status(), e, limit))?;
    let files = collect_files(&mut multipart, limit).await?;

    if files.is_empty() {
        return Err(ApiError::BadRequest("No files provided".to_string()));
    }

    tracing::debug!("Processing {} uploaded file(s)", files.len());

    let report = import_service::import_files(state.sink.as_ref(), files).await;

    if report.all_failed() {
        return Err(ApiError::BadRequest(report.error_summary()));
    }

    Ok(report.to_string())
}

// =============================================================================
// Form Parsing
// =============================================================================

/// Reads `logText` from the body (multipart or url-encoded), falling back to
/// the query string. Any other body type yields an empty value.
async fn read_log_text(request: Request, limit: Option<usize>) -> ApiResult<String> {
    let query_text = Query::<ImportTextForm>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(form)| form.log_text);

    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_default();

    let body_text = if content_type.starts_with("multipart/form-data") {
        read_multipart_log_text(request, limit).await?
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(form) = Form::<ImportTextForm>::from_request(request, &())
            .await
            .map_err(|e| form_error(e.status(), e, limit))?;
        form.log_text
    } else {
        None
    };

    Ok(body_text.or(query_text).unwrap_or_default())
}

async fn read_multipart_log_text(
    request: Request,
    limit: Option<usize>,
) -> ApiResult<Option<String>> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| form_error(e.status(), e, limit))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e.status(), e, limit))?
    {
        if field.name() == Some(LOG_TEXT_FIELD) {
            let text = field
                .text()
                .await
                .map_err(|e| form_error(e.status(), e, limit))?;
            return Ok(Some(text));
        }
    }

    Ok(None)
}

/// Buffers every file part before any of them is imported, so a malformed
/// body is rejected without anything having been pushed.
async fn collect_files(
    multipart: &mut Multipart,
    limit: Option<usize>,
) -> ApiResult<Vec<UploadedFile>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e.status(), e, limit))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        // Parts without a filename are plain form values, not files
        let name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        let file = match field.bytes().await {
            Ok(content) => UploadedFile::new(name, content),
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(form_error(e.status(), e, limit));
            }
            Err(e) => UploadedFile::unreadable(name, e.body_text()),
        };
        files.push(file);
    }

    Ok(files)
}

fn form_error(status: StatusCode, err: impl Display, limit: Option<usize>) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        let message = match limit {
            Some(limit) => format!("Request body exceeds {} bytes", limit),
            None => "Request body too large".to_string(),
        };
        return ApiError::PayloadTooLarge(message);
    }

    ApiError::BadRequest(format!("Failed to parse form: {}", err))
}
