use serde::{Deserialize, Serialize};

/// Mode for regular, non-executable files.
pub const TREE_BLOB_MODE: &str = "100644";
/// Tree entry type for file content.
pub const TREE_BLOB_TYPE: &str = "blob";
/// Encoding used when sending blob content to the API.
pub const BLOB_ENCODING: &str = "base64";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One file layered onto the base tree.
pub struct TreeEntry {
    /// Destination path in the repository
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Sha of the blob holding the file content
    pub sha: String,
}

impl TreeEntry {
    /// Entry for a regular file blob at `path`.
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: TREE_BLOB_MODE.into(),
            kind: TREE_BLOB_TYPE.into(),
            sha: sha.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
/// Request to create a tree on top of an existing one. Entries not named
/// here are carried over from `base_tree` unchanged.
pub struct NewTree {
    pub base_tree: String,
    pub tree: Vec<TreeEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBlob {
    pub content: String,
    pub encoding: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCommit {
    pub message: String,
    pub tree: String,
    pub parents: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
/// Branch pointer update. `force` stays false so a branch that moved since
/// it was read is rejected rather than overwritten.
pub struct RefUpdate {
    pub sha: String,
    pub force: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Blob {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub sha: String,
}
