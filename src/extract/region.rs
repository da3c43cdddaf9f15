//! Locates the three page regions the extractors read from.
//!
//! The anchors are an identifier chain (`body` > `#outer` > `#inner` > `#main`) plus sibling
//! positions inside `#main`. Layout drift is expected to surface here as
//! [ExtractError::StructuralMismatch] and nowhere else.

use super::error::ExtractError;
use super::query;
use scraper::{ElementRef, Html};

/// Zero-based position of the download menu among `#main`'s direct `ul` children.
const DOWNLOAD_MENU_UL_INDEX: usize = 1;

/// Sub-trees of one work page.
#[derive(Debug, Clone, Copy)]
pub struct Regions<'a> {
    /// Holds title, byline, and summary.
    pub preface: ElementRef<'a>,
    /// Holds the tag definition list, language, and stats.
    pub categorization: ElementRef<'a>,
    /// None when the page has no download menu; that is not an error.
    pub download_menu: Option<ElementRef<'a>>,
}

/// Walk `body` > `#outer` > `#inner` > `#main`. Shared with the search listing parser.
pub fn main_container(doc: &Html) -> Result<ElementRef<'_>, ExtractError> {
    let body = query::find_first(doc.root_element(), "body")
        .ok_or(ExtractError::StructuralMismatch { anchor: "body" })?;
    let outer =
        query::by_id(body, "outer").ok_or(ExtractError::StructuralMismatch { anchor: "#outer" })?;
    let inner =
        query::by_id(outer, "inner").ok_or(ExtractError::StructuralMismatch { anchor: "#inner" })?;
    query::by_id(inner, "main").ok_or(ExtractError::StructuralMismatch { anchor: "#main" })
}

pub fn locate(doc: &Html) -> Result<Regions<'_>, ExtractError> {
    let main = main_container(doc)?;

    let workskin = query::by_id(main, "workskin")
        .ok_or(ExtractError::StructuralMismatch { anchor: "#workskin" })?;
    let preface = query::find_first(workskin, "div").ok_or(ExtractError::StructuralMismatch {
        anchor: "preface div in #workskin",
    })?;

    let categorization = query::children(main)
        .find(|el| query::is_named(*el, "div") && query::has_class(*el, "wrapper"))
        .ok_or(ExtractError::StructuralMismatch {
            anchor: "div.wrapper in #main",
        })?;

    let download_menu = query::children(main)
        .filter(|el| query::is_named(*el, "ul"))
        .nth(DOWNLOAD_MENU_UL_INDEX);
    if download_menu.is_none() {
        tracing::debug!("work page has no download menu");
    }

    Ok(Regions {
        preface,
        categorization,
        download_menu,
    })
}
