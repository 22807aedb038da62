//! Axum router and request handlers.
//!
//! Routes:
//! - `GET  /`       - Upload form
//! - `POST /upload` - Multipart upload committed to the default branch

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::*;
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::{
    error::UploadError,
    http::{AppState, form::read_upload_form},
    pipeline::{UploadRequest, commit_upload},
    staging::StagingArea,
};

/// Message returned once the branch has been advanced.
pub const SUCCESS_MESSAGE: &str = "Files uploaded successfully";

const INDEX_HTML: &str = include_str!("index.html");

/// Build the axum [`Router`] with all HTTP routes and shared state.
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handle_index))
        .route("/upload", post(handle_upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JSON body of every `/upload` response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `POST /upload`
///
/// Stages the submitted files, validates the form and runs the commit
/// pipeline. Staged files are removed whatever the outcome.
async fn handle_upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let multipart = multipart
        .map_err(|rej| UploadError::InvalidMultipart(rej.body_text()))?;

    let mut staging = StagingArea::new(&state.config.staging_dir)?;

    let result = process_upload(&state, multipart, &mut staging).await;
    let staged = staging.staged_count();
    let cleanup = staging.cleanup().await;

    match (result, cleanup) {
        (Err(err), cleanup) => {
            if let Err(cleanup_err) = cleanup {
                error!("failed to remove {staged} staged file(s): {cleanup_err}");
            }
            Err(err.into())
        }
        (Ok(()), Err(cleanup_err)) => {
            error!("failed to remove {staged} staged file(s): {cleanup_err}");
            Err(cleanup_err.into())
        }
        (Ok(()), Ok(())) => Ok(Json(MessageResponse {
            message: SUCCESS_MESSAGE.into(),
        })),
    }
}

async fn process_upload(
    state: &AppState,
    multipart: Multipart,
    staging: &mut StagingArea,
) -> Result<(), UploadError> {
    let form = read_upload_form(multipart, staging).await?;

    let request = UploadRequest::new(
        form.token,
        form.repo_name,
        staging.files().to_vec(),
    )?;

    commit_upload(state.connector.as_ref(), &state.config.api_base, &request)
        .await?;

    Ok(())
}

/// Application-level error that maps to a `{"message": ...}` response.
#[derive(Debug)]
pub struct AppError(UploadError);

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.0.status();

        if status.is_server_error() {
            error!("upload failed: {}", self.0);
        } else {
            warn!("rejected upload: {}", self.0);
        }

        let body = MessageResponse {
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
