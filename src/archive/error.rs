//! Errors from fetching pages and files and turning them into records.

use crate::extract::ExtractError;
use crate::model::DownloadFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Invalid work URL or id: {input:?}: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Failed to create HTTP client: {source}")]
    Client { source: reqwest::Error },

    #[error("Network error: could not reach {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Not found: {url}")]
    NotFound { url: String },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read response body from {url}: {source}")]
    BodyRead { url: String, source: reqwest::Error },

    #[error("Could not extract work at {url}: {source}")]
    Extract {
        url: String,
        #[source]
        source: ExtractError,
    },

    #[error("Work does not offer a {format} download.")]
    FormatUnavailable { format: DownloadFormat },
}

impl ArchiveError {
    pub(crate) fn extract(url: &str) -> impl FnOnce(ExtractError) -> ArchiveError + '_ {
        move |source| ArchiveError::Extract {
            url: url.to_string(),
            source,
        }
    }
}
