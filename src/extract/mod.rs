//! Metadata extraction engine. Pure over a parsed page: no I/O, no shared state.
//!
//! [extract_work] locates the page regions once, runs each extractor against its region, and
//! returns the first hard failure or a complete [WorkRecord](crate::model::WorkRecord).

mod error;

pub mod categorization;
pub mod downloads;
pub mod preface;
pub mod query;
pub mod region;
pub mod stats;

#[cfg(test)]
pub(crate) mod fixtures;

pub use categorization::TagKind;
pub use error::ExtractError;
pub use region::Regions;

use crate::model::WorkRecord;
use scraper::Html;

/// Every link on the page is site-relative; this is prepended to make it absolute.
pub const SITE_ORIGIN: &str = "https://archiveofourown.org";

pub fn extract_work(doc: &Html) -> Result<WorkRecord, ExtractError> {
    let regions = region::locate(doc)?;
    let preface = preface::extract_preface(regions.preface);
    let classified = categorization::classify(regions.categorization)?;
    let downloads = downloads::resolve(regions.download_menu);

    Ok(WorkRecord {
        title: preface.title,
        author: preface.author,
        summary: preface.summary,
        language: classified.language,
        categorization: classified.categorization,
        stats: classified.stats,
        downloads,
        url: None,
    })
}

/// Parse `html` as a full document and extract it.
pub fn extract_work_from_html(html: &str) -> Result<WorkRecord, ExtractError> {
    extract_work(&Html::parse_document(html))
}
