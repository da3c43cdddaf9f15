//! Rendering records for the terminal and writing fetched files to disk.

use crate::model::{StatisticsBlock, WorkRecord};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How `--info` output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoFormat {
    Text,
    Json,
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write output: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The eight statistics, one per line.
pub fn format_stats(stats: &StatisticsBlock) -> String {
    [
        stats.published.clone(),
        stats.status.clone(),
        format!("Words: {}", stats.words),
        format!("Chapters: {}", stats.chapters),
        format!("Comments: {}", stats.comments),
        format!("Kudos: {}", stats.kudos),
        format!("Bookmarks: {}", stats.bookmarks),
        format!("Hits: {}", stats.hits),
    ]
    .into_iter()
    .filter(|line| !line.is_empty())
    .collect::<Vec<_>>()
    .join("\n")
}

fn quoted(items: &[String], sep: &str) -> String {
    items
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(sep)
}

/// Human-readable block. The summary is converted from markup to Markdown.
pub fn render_info(record: &WorkRecord) -> String {
    let c = &record.categorization;
    let mut out = String::new();
    if let Some(ref url) = record.url {
        let link = url.split('?').next().unwrap_or(url);
        out.push_str(&format!("from link: {}\n\n", link));
    }
    out.push_str("==work info==\n");
    out.push_str(&format!("title: {}\n", record.title));
    out.push_str(&format!("author: {}\n", record.author));
    out.push_str(&format!("language: {}\n", record.language));
    out.push_str(&format!("fandoms: {}\n\n", quoted(&c.fandoms, ", ")));
    out.push_str(&format!("rating: {}\n", c.rating));
    out.push_str(&format!("warnings: {}\n", c.archive_warnings.join(", ")));
    out.push_str(&format!("categories: {}\n", c.categories.join(", ")));
    out.push_str(&format!("relationships: {}\n", quoted(&c.relationships, ", ")));
    out.push_str(&format!("characters: {}\n", quoted(&c.characters, ", ")));
    out.push_str("============\n\n");

    out.push_str("==tags==\n");
    out.push_str(&quoted(&c.freeform_tags, ",\n"));
    out.push_str("\n========\n\n");

    out.push_str("==stats==\n");
    out.push_str(&format_stats(&record.stats));
    out.push_str("\n=========\n\n");

    out.push_str("==summary==\n");
    out.push_str(html2md::parse_html(&record.summary).trim());
    out.push_str("\n===========\n");
    out
}

pub fn render_json(records: &[WorkRecord]) -> Result<String, FormatError> {
    match records {
        [one] => Ok(serde_json::to_string_pretty(one)?),
        many => Ok(serde_json::to_string_pretty(many)?),
    }
}

/// Write a fetched file to `path`, replacing any existing file.
pub fn write_file(bytes: &[u8], path: &Path) -> Result<(), FormatError> {
    let io_err = |source| FormatError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut f = File::create(path).map_err(io_err)?;
    f.write_all(bytes).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategorizationBlock, ChapterCount};
    use std::error::Error;

    fn record() -> WorkRecord {
        WorkRecord {
            title: "The Long Way Round".to_string(),
            author: "quietfox".to_string(),
            summary: "<p>A slow <em>road</em> trip.</p>".to_string(),
            language: "English".to_string(),
            categorization: CategorizationBlock {
                rating: "General Audiences".to_string(),
                fandoms: vec!["Original Work".to_string()],
                freeform_tags: vec!["Angst".to_string(), "Can't Sleep".to_string()],
                ..Default::default()
            },
            stats: StatisticsBlock {
                published: "Published: 2020-01-01".to_string(),
                words: 12345,
                chapters: ChapterCount {
                    current: 5,
                    total: ChapterCount::UNKNOWN_TOTAL,
                },
                ..Default::default()
            },
            url: Some("https://archiveofourown.org/works/1?view_adult=true".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn format_stats_skips_missing_status() {
        let stats = format_stats(&record().stats);
        assert_eq!(
            stats,
            "Published: 2020-01-01\nWords: 12345\nChapters: 5/?\nComments: 0\nKudos: 0\nBookmarks: 0\nHits: 0"
        );
    }

    #[test]
    fn render_info_includes_link_tags_and_markdown_summary() {
        let text = render_info(&record());
        assert!(text.starts_with("from link: https://archiveofourown.org/works/1\n"));
        assert!(text.contains("title: The Long Way Round\n"));
        assert!(text.contains("fandoms: 'Original Work'\n"));
        assert!(text.contains("'Angst',\n'Can't Sleep'"));
        assert!(text.contains("Chapters: 5/?"));
        assert!(text.contains("A slow "));
        assert!(!text.contains("<p>"));
        assert!(!text.contains("<em>"));
    }

    #[test]
    fn render_json_single_record_is_an_object() -> Result<(), Box<dyn Error>> {
        let json = render_json(&[record()])?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value["title"], "The Long Way Round");
        assert_eq!(value["stats"]["chapters"]["total"], -1);

        let json = render_json(&[record(), record()])?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[test]
    fn write_file_writes_bytes() -> Result<(), Box<dyn Error>> {
        let path = std::env::temp_dir().join("ao3meta_formats_test.epub");
        write_file(b"PK\x03\x04", &path)?;
        assert_eq!(std::fs::read(&path)?, b"PK\x03\x04");
        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn write_file_missing_parent_is_io_error() {
        let path = PathBuf::from("/nonexistent_dir_ao3meta_xyz/out.pdf");
        assert!(matches!(write_file(b"x", &path), Err(FormatError::Io { .. })));
    }
}
