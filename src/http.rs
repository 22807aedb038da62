//! HTTP layer: the axum router serving the upload form and the `/upload`
//! endpoint that feeds the commit pipeline.

use std::sync::Arc;

use crate::{config::ServerConfig, forge::traits::Connector};

pub mod form;
pub mod handler;


/// State shared across all request handlers. Holds no credentials; each
/// request connects with its own token.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub connector: Arc<dyn Connector>,
}

impl AppState {
    pub fn new(config: ServerConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            config: Arc::new(config),
            connector,
        }
    }
}
