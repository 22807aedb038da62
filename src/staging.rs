//! Per-request transient storage for uploaded file bytes.
//!
//! Each request gets its own private directory under the configured staging
//! root. Files are written under generated names so user supplied file names
//! never touch the local filesystem; the original name is kept alongside for
//! use as the destination path in the repository.

use log::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs::File;

use crate::error::Result;

const STAGING_PREFIX: &str = "upload-";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One uploaded file held in transient storage.
pub struct StagedFile {
    /// File name as submitted by the client
    pub original_name: String,
    /// Location of the staged bytes on local disk
    pub path: PathBuf,
}

/// Scoped transient storage for one upload request.
///
/// [`StagingArea::cleanup`] removes everything explicitly; if the area is
/// dropped first the backing directory is still removed by [`TempDir`].
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
    files: Vec<StagedFile>,
}

impl StagingArea {
    /// Create a fresh, empty staging directory under `root`.
    pub fn new(root: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(root)?;

        debug!("created staging directory: {}", dir.path().display());

        Ok(Self { dir, files: vec![] })
    }

    /// Register a new staged file and open it for writing.
    pub async fn create_file(&mut self, original_name: &str) -> Result<File> {
        let path = self.dir.path().join(format!("{:04}", self.files.len()));
        let file = File::create(&path).await?;

        self.files.push(StagedFile {
            original_name: original_name.to_string(),
            path,
        });

        Ok(file)
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn staged_count(&self) -> usize {
        self.files.len()
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Delete all staged bytes and the staging directory itself.
    pub async fn cleanup(self) -> Result<()> {
        for file in self.files.iter() {
            match tokio::fs::remove_file(&file.path).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }

        let count = self.files.len();
        self.dir.close()?;

        debug!("removed {count} staged file(s)");

        Ok(())
    }
}
