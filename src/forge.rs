//! GitHub git-data access for the upload pipeline.
//!
//! Provides per-request token authentication and the low level blob, tree,
//! commit and ref operations the pipeline sequences.

/// Remote repository configuration and identifier parsing.
pub mod config;

/// GitHub API client implementation for GitHub.com and Enterprise.
pub mod github;

/// Request and response types for git-data operations.
pub mod request;

/// Traits abstracting the remote object store.
pub mod traits;
