//! Resolves the download menu into absolute links per format.

use super::query;
use super::SITE_ORIGIN;
use crate::model::{DownloadFormat, DownloadLinks};
use scraper::ElementRef;

/// A missing menu, download item, or format list all give empty links. Unknown labels are skipped.
pub fn resolve(menu: Option<ElementRef<'_>>) -> DownloadLinks {
    let mut links = DownloadLinks::default();
    let Some(formats) = menu
        .and_then(|ul| {
            query::children(ul)
                .find(|li| query::is_named(*li, "li") && query::has_class(*li, "download"))
        })
        .and_then(|li| query::find_first(li, "ul"))
    else {
        return links;
    };

    for li in query::children(formats).filter(|el| query::is_named(*el, "li")) {
        let Some(a) = query::find_first(li, "a") else {
            continue;
        };
        let label = query::inner_text(a);
        let label = label.trim();
        let Some(format) = DownloadFormat::from_label(label) else {
            tracing::debug!(label, "ignoring unknown download format");
            continue;
        };
        let href = query::attr(a, "href").unwrap_or_default();
        links.set(format, format!("{}{}", SITE_ORIGIN, href));
    }
    links
}
