//! Traits related to the remote git object store
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    error::Result,
    forge::{
        config::RemoteConfig,
        request::{Commit, NewCommit, NewTree, Tree},
    },
};

/// Low level git-data operations against one remote repository.
///
/// Every call is a single remote round trip. Blob, tree and commit creation
/// are content-addressed writes; only [`GitData::update_branch`] mutates
/// visible state.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GitData: Send + Sync {
    /// Name of the repository's default branch.
    async fn default_branch(&self) -> Result<String>;

    /// Sha of the commit the branch currently points at.
    async fn branch_sha(&self, branch: &str) -> Result<String>;

    /// Tree object for a commit or tree sha.
    async fn get_tree(&self, sha: &str) -> Result<Tree>;

    /// Store raw bytes as a blob and return its sha.
    async fn create_blob(&self, content: Vec<u8>) -> Result<String>;

    async fn create_tree(&self, tree: NewTree) -> Result<Tree>;

    async fn create_commit(&self, commit: NewCommit) -> Result<Commit>;

    /// Move the branch to `sha` without forcing.
    async fn update_branch(&self, branch: &str, sha: &str) -> Result<()>;
}

/// Builds an authenticated [`GitData`] client for one request.
#[cfg_attr(test, automock)]
pub trait Connector: Send + Sync {
    fn connect(&self, config: RemoteConfig) -> Result<Box<dyn GitData>>;
}
