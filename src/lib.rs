pub mod cli;
pub mod config;
pub mod error;
pub mod forge;
pub mod http;
pub mod pipeline;
pub mod staging;

pub use error::{Result, UploadError};

#[cfg(test)]
pub mod test_helpers;
