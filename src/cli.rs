//! CLI argument parsing.
use clap::Parser;
use std::path::PathBuf;

use crate::{
    config::{
        DEFAULT_HOST, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT, ServerConfig,
    },
    forge::config::DEFAULT_API_BASE,
};

/// Serve a web form that commits uploaded files to a GitHub repository.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    /// Address to listen on.
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    /// Port to listen on.
    pub port: u16,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE)]
    /// GitHub API base URL. Set this for GitHub Enterprise.
    pub api_base: String,

    #[arg(long, env = "UPLOAD_STAGING_DIR")]
    /// Directory for transient upload storage. Defaults to a directory
    /// under the OS temp dir.
    pub staging_dir: Option<PathBuf>,

    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    /// Maximum size of one upload request body in bytes.
    pub max_upload_bytes: usize,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

impl Args {
    /// Resolve the server configuration from parsed arguments.
    pub fn server_config(&self) -> ServerConfig {
        let defaults = ServerConfig::default();

        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            api_base: self.api_base.clone(),
            staging_dir: self
                .staging_dir
                .clone()
                .unwrap_or(defaults.staging_dir),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}
