//! Server configuration resolved from CLI arguments and environment.
use std::path::PathBuf;

use crate::forge::config::DEFAULT_API_BASE;

/// Default listen host.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default listen port.
pub const DEFAULT_PORT: u16 = 3001;
/// Default cap on the size of one upload request body (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
/// Directory name used under the OS temp dir when no staging dir is given.
pub const DEFAULT_STAGING_DIR_NAME: &str = "repodrop-uploads";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// GitHub REST API base URL.
    pub api_base: String,
    /// Root under which each request gets its own staging directory.
    pub staging_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_base: DEFAULT_API_BASE.to_string(),
            staging_dir: std::env::temp_dir().join(DEFAULT_STAGING_DIR_NAME),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
