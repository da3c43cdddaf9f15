//! Canonical data model for an extracted work.
//!
//! The extraction engine builds these once per page; renderers and the CLI consume them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything extracted from one work's detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRecord {
    pub title: String,
    pub author: String,
    /// Summary paragraphs as inner markup, separated by a blank line.
    pub summary: String,
    pub language: String,
    pub categorization: CategorizationBlock,
    pub stats: StatisticsBlock,
    pub downloads: DownloadLinks,
    /// Normalized page URL when the record came from a fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl WorkRecord {
    /// Title made safe for use as a file name stem.
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .title
            .chars()
            .map(|c| match c {
                '\t' | '\n' | '/' | '\\' | ';' | ':' => '_',
                c if (c as u32) > 0xFF => '_',
                c => c,
            })
            .collect();
        let stem = stem.trim();
        if stem.is_empty() {
            "work".to_string()
        } else {
            stem.to_string()
        }
    }
}

/// Descriptive facets. `rating` is a single value; every list keeps page order and has no empty entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizationBlock {
    pub rating: String,
    pub archive_warnings: Vec<String>,
    pub categories: Vec<String>,
    pub fandoms: Vec<String>,
    pub relationships: Vec<String>,
    pub characters: Vec<String>,
    pub freeform_tags: Vec<String>,
}

/// Numeric and dated statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsBlock {
    /// Label and date as shown, e.g. `Published: 2020-01-01`.
    pub published: String,
    /// `Updated: ...` or `Completed: ...`, empty for single-chapter works.
    pub status: String,
    pub words: i64,
    pub chapters: ChapterCount,
    pub comments: i64,
    pub kudos: i64,
    pub bookmarks: i64,
    pub hits: i64,
}

/// Posted chapters over planned chapters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterCount {
    pub current: i64,
    /// [ChapterCount::UNKNOWN_TOTAL] when the author has not announced a total.
    pub total: i64,
}

impl ChapterCount {
    pub const UNKNOWN_TOTAL: i64 = -1;

    /// The planned total, or None while it is unknown.
    pub fn known_total(&self) -> Option<i64> {
        if self.total == Self::UNKNOWN_TOTAL {
            None
        } else {
            Some(self.total)
        }
    }
}

impl fmt::Display for ChapterCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.known_total() {
            Some(total) => write!(f, "{}/{}", self.current, total),
            None => write!(f, "{}/?", self.current),
        }
    }
}

/// Absolute download URL per format; empty when the format is not offered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLinks {
    pub azw3: String,
    pub epub: String,
    pub mobi: String,
    pub pdf: String,
    pub html: String,
}

impl DownloadLinks {
    /// URL for `format`, or None when the page offered no link for it.
    pub fn get(&self, format: DownloadFormat) -> Option<&str> {
        let url = match format {
            DownloadFormat::Azw3 => &self.azw3,
            DownloadFormat::Epub => &self.epub,
            DownloadFormat::Mobi => &self.mobi,
            DownloadFormat::Pdf => &self.pdf,
            DownloadFormat::Html => &self.html,
        };
        if url.is_empty() {
            None
        } else {
            Some(url)
        }
    }

    pub fn set(&mut self, format: DownloadFormat, url: String) {
        let slot = match format {
            DownloadFormat::Azw3 => &mut self.azw3,
            DownloadFormat::Epub => &mut self.epub,
            DownloadFormat::Mobi => &mut self.mobi,
            DownloadFormat::Pdf => &mut self.pdf,
            DownloadFormat::Html => &mut self.html,
        };
        *slot = url;
    }

    pub fn is_empty(&self) -> bool {
        DownloadFormat::ALL.iter().all(|f| self.get(*f).is_none())
    }
}

/// The closed set of downloadable formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadFormat {
    Azw3,
    Epub,
    Mobi,
    Pdf,
    Html,
}

impl DownloadFormat {
    pub const ALL: [DownloadFormat; 5] = [
        DownloadFormat::Azw3,
        DownloadFormat::Epub,
        DownloadFormat::Mobi,
        DownloadFormat::Pdf,
        DownloadFormat::Html,
    ];

    /// Link text used in the download menu.
    pub fn label(self) -> &'static str {
        match self {
            DownloadFormat::Azw3 => "AZW3",
            DownloadFormat::Epub => "EPUB",
            DownloadFormat::Mobi => "MOBI",
            DownloadFormat::Pdf => "PDF",
            DownloadFormat::Html => "HTML",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DownloadFormat::Azw3 => "azw3",
            DownloadFormat::Epub => "epub",
            DownloadFormat::Mobi => "mobi",
            DownloadFormat::Pdf => "pdf",
            DownloadFormat::Html => "html",
        }
    }

    /// Exact, case-sensitive match on the menu label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }
}

impl fmt::Display for DownloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
