//! Classifies the tag entries of the work meta list.
//!
//! Each `dd.tags` entry names its kind with the first token of its class attribute. The kind
//! set is closed: an unseen token means the template changed and extraction stops.

use super::error::ExtractError;
use super::query;
use super::stats;
use crate::model::{CategorizationBlock, StatisticsBlock};
use scraper::ElementRef;
use std::str::FromStr;

/// Apostrophe spellings that survive parsing when the source text was escaped twice.
/// Replacements never contain `&`, so one pass leaves nothing new to decode.
pub const FREEFORM_ENTITY_DECODES: &[(&str, &str)] = &[
    ("&#39;", "'"),
    ("&#x27;", "'"),
    ("&apos;", "'"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Rating,
    Warning,
    Category,
    Fandom,
    Relationship,
    Character,
    Freeform,
}

impl FromStr for TagKind {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rating" => Ok(TagKind::Rating),
            "warning" => Ok(TagKind::Warning),
            "category" => Ok(TagKind::Category),
            "fandom" => Ok(TagKind::Fandom),
            "relationship" => Ok(TagKind::Relationship),
            "character" => Ok(TagKind::Character),
            "freeform" => Ok(TagKind::Freeform),
            other => Err(ExtractError::UnknownCategoryKind {
                kind: other.to_string(),
            }),
        }
    }
}

/// What the categorization region yields. Stats live beside the tags in the same list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub categorization: CategorizationBlock,
    pub language: String,
    pub stats: StatisticsBlock,
}

pub fn classify(region: ElementRef<'_>) -> Result<Classified, ExtractError> {
    let meta = query::find_first(region, "dl").ok_or(ExtractError::StructuralMismatch {
        anchor: "dl in div.wrapper",
    })?;

    let mut out = Classified::default();
    let mut stats_entry = None;

    for dd in query::children(meta).filter(|el| query::is_named(*el, "dd")) {
        if query::has_class(dd, "tags") {
            let token = query::class_token(dd).unwrap_or_default();
            let kind: TagKind = token.parse()?;
            apply_tag_entry(&mut out.categorization, kind, dd);
        } else if query::has_class(dd, "language") {
            out.language = query::first_text(dd)
                .map(|t| t.trim().to_string())
                .unwrap_or_default();
        } else if query::has_class(dd, "stats") {
            stats_entry = Some(dd);
        } else {
            tracing::debug!(
                class = query::attr(dd, "class").unwrap_or_default(),
                "skipping unclassified meta entry"
            );
        }
    }

    out.stats = match stats_entry {
        Some(dd) => stats::normalize(dd)?,
        None => stats::normalize_pairs(&Default::default())?,
    };
    Ok(out)
}

fn apply_tag_entry(block: &mut CategorizationBlock, kind: TagKind, dd: ElementRef<'_>) {
    let list = query::find_first(dd, "ul");
    match kind {
        TagKind::Rating => {
            block.rating = list
                .and_then(|ul| query::find_first(ul, "a"))
                .map(|a| query::inner_text(a).trim().to_string())
                .unwrap_or_default();
        }
        TagKind::Warning => block.archive_warnings = tag_list(list, false),
        TagKind::Category => block.categories = tag_list(list, false),
        TagKind::Fandom => block.fandoms = tag_list(list, false),
        TagKind::Relationship => block.relationships = tag_list(list, false),
        TagKind::Character => block.characters = tag_list(list, false),
        TagKind::Freeform => block.freeform_tags = tag_list(list, true),
    }
}

/// First-link text of every list item, in order, empty entries dropped.
fn tag_list(list: Option<ElementRef<'_>>, decode: bool) -> Vec<String> {
    let Some(ul) = list else {
        return Vec::new();
    };
    query::children(ul)
        .filter_map(|li| query::find_first(li, "a"))
        .map(|a| query::inner_text(a).trim().to_string())
        .filter(|tag| !tag.is_empty())
        .map(|tag| if decode { decode_entities(&tag) } else { tag })
        .collect()
}

/// Single left-to-right pass over `s`; text produced by a replacement is not rescanned.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];
        match FREEFORM_ENTITY_DECODES
            .iter()
            .find(|(from, _)| rest.starts_with(from))
        {
            Some((from, to)) => {
                out.push_str(to);
                rest = &rest[from.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
