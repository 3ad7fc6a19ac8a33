//! Error types for manifest fetching and parsing.

use thiserror::Error;

use crate::download::DownloadError;

/// Errors that can occur while obtaining the playlist manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest could not be fetched.
    #[error("failed to fetch manifest: {source}")]
    Fetch {
        /// The underlying transfer error.
        #[from]
        source: DownloadError,
    },

    /// The manifest is not a well-formed playlist document.
    #[error("failed to parse manifest: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },
}

impl ManifestError {
    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
