//! Title, author, and summary from the preface region.

use super::query;
use scraper::ElementRef;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preface {
    pub title: String,
    pub author: String,
    pub summary: String,
}

/// Missing pieces come back empty; the preface never fails once the region was located.
pub fn extract_preface(preface: ElementRef<'_>) -> Preface {
    let title = query::find_first(preface, "h2")
        .map(|h2| query::inner_text(h2).trim().to_string())
        .unwrap_or_default();

    // First author only; co-authors follow as further links in the same byline.
    let author = query::find_first(preface, "h3")
        .and_then(|h3| query::find_first(h3, "a"))
        .map(|a| query::inner_text(a).trim().to_string())
        .unwrap_or_default();

    let summary = query::find_first(preface, "div")
        .and_then(|div| query::find_first(div, "blockquote"))
        .map(|quote| {
            query::children(quote)
                .map(query::inner_markup)
                .collect::<Vec<_>>()
                .join("\n\n")
                .trim()
                .to_string()
        })
        .unwrap_or_default();

    Preface {
        title,
        author,
        summary,
    }
}
