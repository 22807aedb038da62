//! Shared test fixtures: an in-memory remote repository and staging helpers.
use async_trait::async_trait;
use std::{
    collections::{BTreeMap, HashMap, hash_map::DefaultHasher},
    hash::{Hash, Hasher},
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};
use tokio::io::AsyncWriteExt;

use crate::{
    error::{Result, UploadError},
    forge::{
        request::{Commit, NewCommit, NewTree, Tree},
        traits::GitData,
    },
    staging::StagingArea,
};

pub const FAKE_DEFAULT_BRANCH: &str = "main";
pub const CONCURRENT_FILE: &str = "concurrent.txt";

fn object_id(kind: &str, bytes: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    kind.hash(&mut hasher);
    bytes.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[derive(Debug, Clone)]
pub struct FakeCommit {
    pub tree: String,
    pub parents: Vec<String>,
    pub message: String,
}

/// Object store and refs of one repository, addressed like git: blobs and
/// trees by content, commits by content plus a sequence number.
#[derive(Debug, Default)]
pub struct FakeRepo {
    pub default_branch: String,
    pub branches: HashMap<String, String>,
    pub blobs: HashMap<String, Vec<u8>>,
    pub trees: HashMap<String, BTreeMap<String, String>>,
    pub commits: HashMap<String, FakeCommit>,
    /// Names of the GitData calls received, in order.
    pub calls: Vec<&'static str>,
    /// Move the default branch right after the next tree fetch, as if
    /// another writer pushed in between.
    pub race_on_tree_fetch: bool,
    commit_seq: u64,
}

impl FakeRepo {
    pub fn insert_blob(&mut self, content: &[u8]) -> String {
        let sha = object_id("blob", content);
        self.blobs.insert(sha.clone(), content.to_vec());
        sha
    }

    pub fn insert_tree(&mut self, entries: BTreeMap<String, String>) -> String {
        let sha = object_id("tree", format!("{entries:?}").as_bytes());
        self.trees.insert(sha.clone(), entries);
        sha
    }

    pub fn insert_commit(
        &mut self,
        tree: &str,
        parents: Vec<String>,
        message: &str,
    ) -> String {
        self.commit_seq += 1;
        let sha = object_id(
            "commit",
            format!("{tree}{parents:?}{message}{}", self.commit_seq).as_bytes(),
        );
        self.commits.insert(
            sha.clone(),
            FakeCommit {
                tree: tree.to_string(),
                parents,
                message: message.to_string(),
            },
        );
        sha
    }

    /// Current commit of the default branch.
    pub fn tip(&self) -> String {
        self.branches[&self.default_branch].clone()
    }

    pub fn commit(&self, sha: &str) -> FakeCommit {
        self.commits[sha].clone()
    }

    /// Path to content mapping of the tree at a commit.
    pub fn files_at(&self, commit_sha: &str) -> BTreeMap<String, Vec<u8>> {
        let tree = &self.trees[&self.commits[commit_sha].tree];
        tree.iter()
            .map(|(path, blob)| (path.clone(), self.blobs[blob].clone()))
            .collect()
    }

    fn resolve_tree(&self, sha: &str) -> Option<String> {
        if self.trees.contains_key(sha) {
            return Some(sha.to_string());
        }
        self.commits.get(sha).map(|c| c.tree.clone())
    }

    fn is_ancestor(&self, ancestor: &str, commit: &str) -> bool {
        if ancestor == commit {
            return true;
        }
        self.commits
            .get(commit)
            .map(|c| c.parents.iter().any(|p| self.is_ancestor(ancestor, p)))
            .unwrap_or(false)
    }

    fn push_concurrent_commit(&mut self) {
        let tip = self.tip();
        let mut entries = self.trees[&self.commits[&tip].tree].clone();
        let blob = self.insert_blob(b"pushed by someone else");
        entries.insert(CONCURRENT_FILE.to_string(), blob);
        let tree = self.insert_tree(entries);
        let commit = self.insert_commit(&tree, vec![tip], "concurrent push");
        let branch = self.default_branch.clone();
        self.branches.insert(branch, commit);
    }
}

/// In-memory stand-in for the GitHub git-data API.
#[derive(Debug, Clone, Default)]
pub struct FakeRemote {
    repo: Arc<Mutex<FakeRepo>>,
}

impl FakeRemote {
    /// Repository whose default branch has one commit holding `files`.
    pub fn with_files(files: &[(&str, &[u8])]) -> Self {
        let mut repo = FakeRepo {
            default_branch: FAKE_DEFAULT_BRANCH.to_string(),
            ..Default::default()
        };

        let mut entries = BTreeMap::new();
        for (path, content) in files {
            let blob = repo.insert_blob(content);
            entries.insert(path.to_string(), blob);
        }
        let tree = repo.insert_tree(entries);
        let commit = repo.insert_commit(&tree, vec![], "initial commit");
        repo.branches.insert(FAKE_DEFAULT_BRANCH.to_string(), commit);

        Self {
            repo: Arc::new(Mutex::new(repo)),
        }
    }

    pub fn repo(&self) -> MutexGuard<'_, FakeRepo> {
        self.repo.lock().unwrap()
    }
}

#[async_trait]
impl GitData for FakeRemote {
    async fn default_branch(&self) -> Result<String> {
        let mut repo = self.repo();
        repo.calls.push("default_branch");
        Ok(repo.default_branch.clone())
    }

    async fn branch_sha(&self, branch: &str) -> Result<String> {
        let mut repo = self.repo();
        repo.calls.push("branch_sha");
        repo.branches
            .get(branch)
            .cloned()
            .ok_or_else(|| UploadError::remote("Not Found"))
    }

    async fn get_tree(&self, sha: &str) -> Result<Tree> {
        let mut repo = self.repo();
        repo.calls.push("get_tree");
        let tree = repo
            .resolve_tree(sha)
            .ok_or_else(|| UploadError::remote("Not Found"))?;

        if repo.race_on_tree_fetch {
            repo.race_on_tree_fetch = false;
            repo.push_concurrent_commit();
        }

        Ok(Tree { sha: tree })
    }

    async fn create_blob(&self, content: Vec<u8>) -> Result<String> {
        let mut repo = self.repo();
        repo.calls.push("create_blob");
        Ok(repo.insert_blob(&content))
    }

    async fn create_tree(&self, tree: NewTree) -> Result<Tree> {
        let mut repo = self.repo();
        repo.calls.push("create_tree");
        let mut entries = repo
            .trees
            .get(&tree.base_tree)
            .cloned()
            .ok_or_else(|| UploadError::remote("Invalid tree info"))?;

        for entry in tree.tree {
            if !repo.blobs.contains_key(&entry.sha) {
                return Err(UploadError::remote("Invalid tree info"));
            }
            entries.insert(entry.path, entry.sha);
        }

        Ok(Tree {
            sha: repo.insert_tree(entries),
        })
    }

    async fn create_commit(&self, commit: NewCommit) -> Result<Commit> {
        let mut repo = self.repo();
        repo.calls.push("create_commit");
        if !repo.trees.contains_key(&commit.tree) {
            return Err(UploadError::remote("Tree SHA does not exist"));
        }
        let sha =
            repo.insert_commit(&commit.tree, commit.parents, &commit.message);
        Ok(Commit { sha })
    }

    async fn update_branch(&self, branch: &str, sha: &str) -> Result<()> {
        let mut repo = self.repo();
        repo.calls.push("update_branch");
        let current = repo
            .branches
            .get(branch)
            .cloned()
            .ok_or_else(|| UploadError::remote("Reference does not exist"))?;

        if !repo.is_ancestor(&current, sha) {
            return Err(UploadError::remote("Update is not a fast forward"));
        }

        repo.branches.insert(branch.to_string(), sha.to_string());
        Ok(())
    }
}

/// Stage `files` into a fresh staging area under `root`.
pub async fn stage_files(root: &Path, files: &[(&str, &[u8])]) -> StagingArea {
    let mut staging = StagingArea::new(root).unwrap();

    for (name, content) in files {
        let mut file = staging.create_file(name).await.unwrap();
        file.write_all(content).await.unwrap();
        file.flush().await.unwrap();
    }

    staging
}
