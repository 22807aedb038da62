//! Configuration for connecting to the remote repository.
use secrecy::SecretString;
use std::{fmt, str::FromStr};

use crate::error::{Result, UploadError};

/// Default GitHub REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Repository identifier in `owner/repo` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentifier {
    pub owner: String,
    pub repo: String,
}

impl FromStr for RepoIdentifier {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split('/');

        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None)
                if !owner.is_empty() && !repo.is_empty() =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(UploadError::InvalidRepoName),
        }
    }
}

impl fmt::Display for RepoIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Remote repository connection configuration, built fresh for every upload
/// request from the submitted token.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// API base URL (e.g. "https://api.github.com").
    pub api_base: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Access token for authentication.
    pub token: SecretString,
}

impl RemoteConfig {
    pub fn new(
        api_base: impl Into<String>,
        identifier: &RepoIdentifier,
        token: SecretString,
    ) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            owner: identifier.owner.clone(),
            repo: identifier.repo.clone(),
            token,
        }
    }

    /// Full `owner/repo` path.
    pub fn path(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            owner: "".to_string(),
            repo: "".to_string(),
            token: SecretString::from("".to_string()),
        }
    }
}
