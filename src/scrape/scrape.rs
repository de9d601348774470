// src/scrape/scrape.rs
//
// Crawl driver: topics in order, pages in order, one request at a time.
// Pacing lives in the PageSource; this layer only decides what to fetch
// and when to stop.

use tracing::{info, warn};

use crate::{
    config::consts::{SEARCH_PATH, SORT_COLUMN},
    config::options::ScrapeOptions,
    core::net::PageSource,
    model::Work,
    progress::Progress,
    specs::works::parse_listing,
    store::DataSet,
};

/// Query for one results page of a topic, sorted by kudos.
pub fn search_query(topic: &str, page: u32) -> Vec<(&'static str, String)> {
    vec![
        ("work_search[query]", s!(topic)),
        ("work_search[sort_column]", s!(SORT_COLUMN)),
        ("page", page.to_string()),
    ]
}

/// Walk pages 1..=max_pages for one topic.
///
/// Stops early (keeping what it has) when:
/// - a request fails: logged, not retried;
/// - a page has no blurbs;
/// - the page has no enabled "Next" link.
pub fn search_topic(
    source: &mut dyn PageSource,
    topic: &str,
    max_pages: u32,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Vec<Work> {
    let mut works = Vec::new();

    for page in 1..=max_pages {
        info!("Scraping {topic} - Page {page}/{max_pages}");

        let html = match source.fetch(SEARCH_PATH, &search_query(topic, page)) {
            Ok(html) => html,
            Err(e) => {
                warn!("{topic}: page {page} failed: {e}");
                if let Some(p) = progress.as_deref_mut() {
                    p.page_failed(topic, page, &e.to_string());
                    p.topic_done(topic, works.len(), max_pages - page);
                }
                break;
            }
        };

        let listing = parse_listing(&html, topic);
        let found = listing.works.len();
        works.extend(listing.works);

        if let Some(p) = progress.as_deref_mut() {
            p.page_done(topic, page, found);
        }

        let remaining = max_pages - page;
        if listing.blurbs == 0 || !listing.has_next {
            if remaining > 0 {
                info!("{topic}: no further results after page {page}");
            }
            if let Some(p) = progress.as_deref_mut() {
                p.topic_done(topic, works.len(), remaining);
            }
            break;
        }
    }

    works
}

/// Every configured topic, in order, concatenated into one table.
pub fn collect(
    source: &mut dyn PageSource,
    opts: &ScrapeOptions,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> DataSet {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(opts.topics.len() * opts.max_pages as usize);
    }

    let mut all = Vec::new();
    for topic in &opts.topics {
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("Scraping topic: {topic}"));
        }
        let works = search_topic(source, topic, opts.max_pages, progress.as_deref_mut());
        info!("Collected {} works from {topic}", works.len());
        all.extend(works);
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    info!("Total works collected: {}", all.len());

    DataSet { works: all }
}
