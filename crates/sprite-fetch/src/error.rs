use std::path::PathBuf;

use thiserror::Error;

/// Failures that are neither a successful fetch nor a plain "absent".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to create HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
