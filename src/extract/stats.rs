//! Statistics block: collects label/value pairs from the nested stats list, then coerces them.

use super::error::ExtractError;
use super::query;
use crate::model::{ChapterCount, StatisticsBlock};
use scraper::ElementRef;
use std::collections::HashMap;

/// Source text for an unannounced total.
const UNKNOWN_MARKER: &str = "?";

/// Normalize the `dd.stats` entry of the meta list.
pub fn normalize(stats_entry: ElementRef<'_>) -> Result<StatisticsBlock, ExtractError> {
    let pairs = match query::find_first(stats_entry, "dl") {
        Some(dl) => collect_pairs(dl),
        None => HashMap::new(),
    };
    normalize_pairs(&pairs)
}

/// Key is the value element's first class token; value is `label text`, e.g. `Words: 12,345`.
fn collect_pairs(dl: ElementRef<'_>) -> HashMap<String, String> {
    let mut pairs = HashMap::new();
    let mut label = String::new();
    for el in query::children(dl) {
        if query::is_named(el, "dt") {
            label = query::inner_text(el).trim().to_string();
        } else if query::is_named(el, "dd") {
            let Some(key) = query::class_token(el) else {
                continue;
            };
            // Bookmarks is a link to the bookmarks page.
            let value = if key == "bookmarks" {
                query::find_first(el, "a")
                    .map(query::inner_text)
                    .unwrap_or_default()
            } else {
                query::inner_text(el)
            };
            pairs.insert(
                key.to_string(),
                format!("{} {}", label, value.trim()).trim().to_string(),
            );
        }
    }
    pairs
}

/// Derive the typed block. Missing keys read as empty text.
pub fn normalize_pairs(pairs: &HashMap<String, String>) -> Result<StatisticsBlock, ExtractError> {
    let raw = |key: &str| pairs.get(key).map(String::as_str).unwrap_or_default();
    Ok(StatisticsBlock {
        published: raw("published").to_string(),
        status: raw("status").to_string(),
        words: coerce_count("words", raw("words"))?,
        chapters: parse_chapters(raw("chapters"))?,
        comments: coerce_count("comments", raw("comments"))?,
        kudos: coerce_count("kudos", raw("kudos"))?,
        bookmarks: coerce_count("bookmarks", raw("bookmarks"))?,
        hits: coerce_count("hits", raw("hits"))?,
    })
}

/// `Label: 1,234` to 1234. Empty is 0, `?` is -1, anything else must be a non-negative integer.
pub fn coerce_count(field: &str, raw: &str) -> Result<i64, ExtractError> {
    let digits: String = raw
        .rsplit(':')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let digits = digits.trim();
    if digits.is_empty() {
        return Ok(0);
    }
    if digits == UNKNOWN_MARKER {
        return Ok(ChapterCount::UNKNOWN_TOTAL);
    }
    digits
        .parse::<u64>()
        .ok()
        .and_then(|n| i64::try_from(n).ok())
        .ok_or_else(|| ExtractError::NumericFormat {
            field: field.to_string(),
            raw: raw.to_string(),
        })
}

/// `Chapters: 5/?` to current 5, total unknown.
pub fn parse_chapters(raw: &str) -> Result<ChapterCount, ExtractError> {
    let (current, total) = raw.split_once('/').unwrap_or((raw, ""));
    Ok(ChapterCount {
        current: coerce_count("chapters.current", current)?,
        total: coerce_count("chapters.total", total)?,
    })
}
