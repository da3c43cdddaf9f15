//! Talking to the archive: URL normalization, the polite client, fetching and extracting
//! work pages, search listings, and file downloads.

mod client;
mod error;

pub mod search;

pub use client::{PoliteClient, PoliteClientBuilder};
pub use error::ArchiveError;

use crate::extract::{self, SITE_ORIGIN};
use crate::model::{DownloadFormat, WorkRecord};

/// Query that skips the adult-content interstitial and returns every chapter on one page.
const WORK_PAGE_QUERY: &str = "?view_adult=true&view_full_work=true";

/// Canonical URL for a numeric work id.
pub fn work_url_for_id(id: &str) -> String {
    format!("{}/works/{}", SITE_ORIGIN, id)
}

/// Turn a work URL, chapter URL, or bare numeric id into the full-work page URL.
///
/// A chapter path is cut first; otherwise a fragment, otherwise a query string.
pub fn normalize_work_url(input: &str) -> Result<String, ArchiveError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ArchiveError::InvalidUrl {
            input: input.to_string(),
            reason: "empty input".to_string(),
        });
    }
    let base = if let Some(i) = input.find("/chapters/").or_else(|| input.find("/chapter/")) {
        &input[..i]
    } else if let Some(i) = input.find('#') {
        &input[..i]
    } else if let Some(i) = input.find('?') {
        &input[..i]
    } else {
        input
    };
    let base = base.trim().trim_end_matches('/');

    let url = if !base.is_empty() && base.chars().all(|c| c.is_ascii_digit()) {
        work_url_for_id(base)
    } else {
        let parsed = reqwest::Url::parse(base).map_err(|e| ArchiveError::InvalidUrl {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.host_str().is_none() {
            return Err(ArchiveError::InvalidUrl {
                input: input.to_string(),
                reason: "URL has no host".to_string(),
            });
        }
        base.to_string()
    };
    Ok(format!("{}{}", url, WORK_PAGE_QUERY))
}

/// Fetch and extract one work. `input` is anything [normalize_work_url] accepts.
pub fn fetch_work(client: &mut PoliteClient, input: &str) -> Result<WorkRecord, ArchiveError> {
    let url = normalize_work_url(input)?;
    tracing::info!(url = %url, "fetching work");
    let html = client.fetch_text(&url)?;
    let mut record = extract::extract_work_from_html(&html).map_err(ArchiveError::extract(&url))?;
    record.url = Some(url);
    Ok(record)
}

/// Fetch one of the work's downloadable files.
pub fn download(
    client: &mut PoliteClient,
    record: &WorkRecord,
    format: DownloadFormat,
) -> Result<Vec<u8>, ArchiveError> {
    let url = record
        .downloads
        .get(format)
        .ok_or(ArchiveError::FormatUnavailable { format })?;
    tracing::info!(url, %format, "downloading");
    client.fetch_bytes(url)
}
