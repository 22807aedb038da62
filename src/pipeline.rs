//! The upload-to-commit pipeline.
//!
//! Turns a set of staged files into one commit on the default branch:
//! resolve branch → resolve tip → fetch base tree → create blobs → create
//! tree → create commit → move the branch. Objects created before a failing
//! step are left in place; they are unreferenced and harmless.

use futures_util::future::try_join_all;
use log::*;
use secrecy::SecretString;
use std::fmt;

use crate::{
    error::{Result, UploadError},
    forge::{
        config::{RemoteConfig, RepoIdentifier},
        request::{NewCommit, NewTree, TreeEntry},
        traits::{Connector, GitData},
    },
    staging::StagedFile,
};


/// Message used for every commit created by the upload form.
pub const COMMIT_MESSAGE: &str = "Upload files via web interface";

/// A validated upload: everything needed to run the pipeline once.
#[derive(Debug)]
pub struct UploadRequest {
    pub token: SecretString,
    pub repo: RepoIdentifier,
    pub files: Vec<StagedFile>,
}

impl UploadRequest {
    /// Validate raw form input. Fails before any remote call is made.
    ///
    /// Blank values count as missing; the token itself is kept exactly as
    /// submitted.
    pub fn new(
        token: Option<String>,
        repo_name: Option<String>,
        files: Vec<StagedFile>,
    ) -> Result<Self> {
        let token = token.filter(|t| !t.trim().is_empty());
        let repo_name = repo_name.filter(|r| !r.trim().is_empty());

        let (Some(token), Some(repo_name)) = (token, repo_name) else {
            return Err(UploadError::MissingFields);
        };

        if files.is_empty() {
            return Err(UploadError::MissingFields);
        }

        let repo = repo_name.parse::<RepoIdentifier>()?;

        Ok(Self {
            token: SecretString::from(token),
            repo,
            files,
        })
    }
}

/// Where the pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    ResolvingBranch,
    ResolvingCommit,
    FetchingTree,
    CreatingBlobs,
    CreatingTree,
    CreatingCommit,
    UpdatingRef,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::ResolvingBranch => "resolving default branch",
            Stage::ResolvingCommit => "resolving latest commit",
            Stage::FetchingTree => "fetching base tree",
            Stage::CreatingBlobs => "creating blobs",
            Stage::CreatingTree => "creating tree",
            Stage::CreatingCommit => "creating commit",
            Stage::UpdatingRef => "updating ref",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub branch: String,
    pub parent_sha: String,
    pub tree_sha: String,
    pub commit_sha: String,
    /// One entry per uploaded file, in upload order.
    pub entries: Vec<TreeEntry>,
}

/// Drives one upload through the remote object store.
pub struct CommitPipeline<'a> {
    forge: &'a dyn GitData,
    stage: Stage,
}

impl<'a> CommitPipeline<'a> {
    pub fn new(forge: &'a dyn GitData) -> Self {
        Self {
            forge,
            stage: Stage::Validating,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, next: Stage) {
        debug!("upload pipeline: {} -> {}", self.stage, next);
        self.stage = next;
    }

    /// Run every step in order. The first failure stops the run and is
    /// returned unchanged.
    pub async fn run(&mut self, files: &[StagedFile]) -> Result<CommitOutcome> {
        match self.execute(files).await {
            Ok(outcome) => {
                self.advance(Stage::Done);
                Ok(outcome)
            }
            Err(err) => {
                error!("upload failed while {}: {err}", self.stage);
                self.stage = Stage::Failed;
                Err(err)
            }
        }
    }

    async fn execute(&mut self, files: &[StagedFile]) -> Result<CommitOutcome> {
        if files.is_empty() {
            return Err(UploadError::MissingFields);
        }

        self.advance(Stage::ResolvingBranch);
        let branch = self.forge.default_branch().await?;

        self.advance(Stage::ResolvingCommit);
        let parent_sha = self.forge.branch_sha(&branch).await?;
        info!("latest commit on {branch}: {parent_sha}");

        self.advance(Stage::FetchingTree);
        let base_tree = self.forge.get_tree(&parent_sha).await?;

        self.advance(Stage::CreatingBlobs);
        let entries = self.create_blobs(files).await?;

        self.advance(Stage::CreatingTree);
        let tree = self
            .forge
            .create_tree(NewTree {
                base_tree: base_tree.sha,
                tree: entries.clone(),
            })
            .await?;

        self.advance(Stage::CreatingCommit);
        let commit = self
            .forge
            .create_commit(NewCommit {
                message: COMMIT_MESSAGE.into(),
                tree: tree.sha.clone(),
                parents: vec![parent_sha.clone()],
            })
            .await?;

        self.advance(Stage::UpdatingRef);
        self.forge.update_branch(&branch, &commit.sha).await?;

        Ok(CommitOutcome {
            branch,
            parent_sha,
            tree_sha: tree.sha,
            commit_sha: commit.sha,
            entries,
        })
    }

    /// Create one blob per file concurrently. Entries come back in the same
    /// order as `files`, each bound to its own source file.
    async fn create_blobs(&self, files: &[StagedFile]) -> Result<Vec<TreeEntry>> {
        let forge = self.forge;

        try_join_all(files.iter().map(|file| async move {
            let content = tokio::fs::read(&file.path).await?;
            let sha = forge.create_blob(content).await?;
            debug!("staged {} as blob {sha}", file.original_name);
            Ok::<_, UploadError>(TreeEntry::blob(&file.original_name, sha))
        }))
        .await
    }
}

/// Connect with the request's own token and commit its files.
pub async fn commit_upload(
    connector: &dyn Connector,
    api_base: &str,
    request: &UploadRequest,
) -> Result<CommitOutcome> {
    let config =
        RemoteConfig::new(api_base, &request.repo, request.token.clone());

    info!(
        "uploading {} file(s) to {}",
        request.files.len(),
        request.repo
    );

    let forge = connector.connect(config)?;
    let outcome = CommitPipeline::new(forge.as_ref())
        .run(&request.files)
        .await?;

    info!(
        "advanced {}@{} to {}",
        request.repo, outcome.branch, outcome.commit_sha
    );

    Ok(outcome)
}
