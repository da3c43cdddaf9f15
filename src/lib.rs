//! ao3meta: metadata extraction and downloads for Archive of Our Own works.

pub mod archive;
pub mod cli;
pub mod config;
pub mod extract;
pub mod formats;
pub mod model;

// Re-exports for CLI and consumers.
pub use archive::{
    fetch_work, normalize_work_url, ArchiveError, PoliteClient, PoliteClientBuilder,
};
pub use extract::{extract_work, extract_work_from_html, ExtractError, TagKind};
pub use formats::{render_info, render_json, FormatError, InfoFormat};
pub use model::{
    CategorizationBlock, ChapterCount, DownloadFormat, DownloadLinks, StatisticsBlock, WorkRecord,
};
