//! Implements the GitData trait for Github
use async_trait::async_trait;
use base64::{Engine, prelude::BASE64_STANDARD};
use log::*;
use octocrab::{
    Octocrab,
    models::repos::Object,
    params::repos::Reference,
};

use crate::{
    error::{Result, UploadError},
    forge::{
        config::RemoteConfig,
        request::{
            BLOB_ENCODING, Blob, Commit, NewBlob, NewCommit, NewTree,
            RefUpdate, Tree,
        },
        traits::{Connector, GitData},
    },
};

/// GitHub git-data client using Octocrab, authenticated with the token
/// submitted alongside the upload.
pub struct Github {
    config: RemoteConfig,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL configuration. No network calls are made here.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let instance = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(config.api_base.clone())?
            .build()?;

        Ok(Self { config, instance })
    }

    fn git_endpoint(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/git/{}",
            self.config.api_base, self.config.owner, self.config.repo, path
        )
    }
}

#[async_trait]
impl GitData for Github {
    async fn default_branch(&self) -> Result<String> {
        let repo = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .get()
            .await?;

        repo.default_branch
            .ok_or_else(|| UploadError::MissingDefaultBranch(self.config.path()))
    }

    async fn branch_sha(&self, branch: &str) -> Result<String> {
        let branch_ref = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .get_ref(&Reference::Branch(branch.to_string()))
            .await?;

        match branch_ref.object {
            Object::Commit { sha, .. } => Ok(sha),
            _ => Err(UploadError::UnexpectedRefTarget(format!(
                "heads/{branch}"
            ))),
        }
    }

    async fn get_tree(&self, sha: &str) -> Result<Tree> {
        let endpoint = self.git_endpoint(&format!("trees/{sha}"));

        let tree: Tree = self.instance.get(endpoint, None::<&()>).await?;

        debug!("resolved tree {} for {sha}", tree.sha);

        Ok(tree)
    }

    async fn create_blob(&self, content: Vec<u8>) -> Result<String> {
        let endpoint = self.git_endpoint("blobs");

        let body = NewBlob {
            content: BASE64_STANDARD.encode(&content),
            encoding: BLOB_ENCODING.into(),
        };

        let blob: Blob = self.instance.post(endpoint, Some(&body)).await?;

        debug!("created blob {} ({} bytes)", blob.sha, content.len());

        Ok(blob.sha)
    }

    async fn create_tree(&self, tree: NewTree) -> Result<Tree> {
        let endpoint = self.git_endpoint("trees");

        info!("creating tree starting from: {}", tree.base_tree);

        let tree: Tree = self.instance.post(endpoint, Some(&tree)).await?;

        info!("created new tree: {}", tree.sha);

        Ok(tree)
    }

    async fn create_commit(&self, commit: NewCommit) -> Result<Commit> {
        let endpoint = self.git_endpoint("commits");

        let commit: Commit =
            self.instance.post(endpoint, Some(&commit)).await?;

        info!("created commit: {}", commit.sha);

        Ok(commit)
    }

    async fn update_branch(&self, branch: &str, sha: &str) -> Result<()> {
        let endpoint = self.git_endpoint(&format!("refs/heads/{branch}"));

        let body = RefUpdate {
            sha: sha.to_string(),
            force: false,
        };

        let _: serde_json::Value =
            self.instance.patch(endpoint, Some(&body)).await?;

        info!("updated branch {branch} to {sha}");

        Ok(())
    }
}

/// Connector producing a fresh [`Github`] client per request.
#[derive(Debug, Default, Clone, Copy)]
pub struct GithubConnector;

impl Connector for GithubConnector {
    fn connect(&self, config: RemoteConfig) -> Result<Box<dyn GitData>> {
        Ok(Box::new(Github::new(config)?))
    }
}
