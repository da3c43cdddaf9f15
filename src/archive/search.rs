//! Search listings: find the work ids on one listing page, then fetch and extract each work.

use super::{fetch_work, work_url_for_id, ArchiveError, PoliteClient};
use crate::extract::region::main_container;
use crate::extract::{query, ExtractError};
use crate::model::WorkRecord;
use scraper::Html;

/// Zero-based position of the results list among the `ol` elements under `#main`.
const RESULTS_OL_INDEX: usize = 1;

/// Works collected from a listing. `failure` is the error that stopped collection, if any;
/// `works` holds every record completed before it.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub works: Vec<WorkRecord>,
    pub failure: Option<ArchiveError>,
}

/// Work ids on a listing page, in listing order.
pub fn parse_listing(html: &str) -> Result<Vec<String>, ExtractError> {
    let doc = Html::parse_document(html);
    let main = main_container(&doc)?;
    let results = query::find_nth(main, "ol", RESULTS_OL_INDEX).ok_or(
        ExtractError::StructuralMismatch {
            anchor: "results ol in #main",
        },
    )?;
    Ok(query::children(results)
        .filter_map(|li| query::attr(li, "id"))
        .filter_map(work_id)
        .map(str::to_string)
        .collect())
}

/// `work_123` to `123`.
fn work_id(element_id: &str) -> Option<&str> {
    let id = element_id.strip_prefix("work_")?;
    (!id.is_empty() && id.chars().all(|c| c.is_ascii_digit())).then_some(id)
}

/// Fetch the listing at `url` and extract every work on it, one at a time.
///
/// Failing to read the listing itself is an error. A failure on an individual work stops the
/// run and is reported in [SearchOutcome::failure].
pub fn collect_search(
    client: &mut PoliteClient,
    url: &str,
    progress: Option<&dyn Fn(u32, u32)>,
) -> Result<SearchOutcome, ArchiveError> {
    reqwest::Url::parse(url).map_err(|e| ArchiveError::InvalidUrl {
        input: url.to_string(),
        reason: e.to_string(),
    })?;
    let html = client.fetch_text(url)?;
    let ids = parse_listing(&html).map_err(ArchiveError::extract(url))?;
    tracing::info!(url, works = ids.len(), "parsed search listing");

    let total = ids.len() as u32;
    let mut outcome = SearchOutcome::default();
    for (i, id) in ids.iter().enumerate() {
        if let Some(p) = progress {
            p(i as u32 + 1, total);
        }
        match fetch_work(client, &work_url_for_id(id)) {
            Ok(record) => outcome.works.push(record),
            Err(e) => {
                tracing::warn!(work = %id, error = %e, "stopping search collection");
                outcome.failure = Some(e);
                break;
            }
        }
    }
    Ok(outcome)
}
