//! Reads the multipart upload form, streaming file parts straight into
//! transient storage.
use axum::extract::Multipart;
use log::*;
use tokio::io::AsyncWriteExt;

use crate::{error::Result, staging::StagingArea};

pub const FILES_FIELD: &str = "files";
/// Bracketed alias sent by some form libraries for repeated fields.
pub const FILES_ARRAY_FIELD: &str = "files[]";
pub const TOKEN_FIELD: &str = "token";
pub const REPO_NAME_FIELD: &str = "repoName";

/// Text fields of the upload form. Files live in the [`StagingArea`].
#[derive(Debug, Default)]
pub struct UploadForm {
    pub token: Option<String>,
    pub repo_name: Option<String>,
}

/// Consume the multipart body, staging every file part.
///
/// File parts without a file name are skipped: browsers send one such empty
/// part when the picker is left blank.
pub async fn read_upload_form(
    mut multipart: Multipart,
    staging: &mut StagingArea,
) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            FILES_FIELD | FILES_ARRAY_FIELD => {
                let file_name =
                    field.file_name().unwrap_or_default().to_string();

                if file_name.is_empty() {
                    debug!("skipping file part without a file name");
                    continue;
                }

                let mut file = staging.create_file(&file_name).await?;
                let mut size = 0;

                while let Some(chunk) = field.chunk().await? {
                    size += chunk.len();
                    file.write_all(&chunk).await?;
                }

                file.flush().await?;

                debug!("staged upload {file_name} ({size} bytes)");
            }
            TOKEN_FIELD => form.token = Some(field.text().await?),
            REPO_NAME_FIELD => form.repo_name = Some(field.text().await?),
            other => debug!("ignoring unexpected form field: {other}"),
        }
    }

    Ok(form)
}
