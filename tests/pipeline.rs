// tests/pipeline.rs
//
// Offline end to end: scripted listing pages → crawl → snapshot → reload → report.

use std::collections::HashMap;

use fic_scrape::analysis::{report, stats};
use fic_scrape::config::options::{AppOptions, ExportFormat, ScrapeOptions};
use fic_scrape::core::net::PageSource;
use fic_scrape::progress::NullProgress;
use fic_scrape::{scrape, store, Error, Result};

const BLURB: &str = include_str!("fixtures/blurb.html");

struct Row<'a> {
    id: u32,
    title: &'a str,
    author: &'a str,
    rating: &'a str,
    category: &'a str,
    words: &'a str,
    kudos: &'a str,
    hits: &'a str,
}

fn blurb(topic: &str, r: &Row) -> String {
    BLURB
        .replace("{id}", &r.id.to_string())
        .replace("{title}", r.title)
        .replace("{author}", r.author)
        .replace("{topic}", topic)
        .replace("{rating}", r.rating)
        .replace("{category}", r.category)
        .replace("{words}", r.words)
        .replace("{kudos}", r.kudos)
        .replace("{bookmarks}", "10")
        .replace("{hits}", r.hits)
}

fn page(blurbs: &[String], next: bool) -> String {
    let pagination = if next {
        r#"<ol class="pagination actions"><li class="next"><a rel="next" href="?page=2">Next →</a></li></ol>"#
    } else {
        r#"<ol class="pagination actions"><li class="next"><span class="disabled">Next →</span></li></ol>"#
    };
    format!(r#"<html><body><ol class="work index group">{}</ol>{pagination}</body></html>"#, blurbs.concat())
}

/// Serves pages keyed by (query, page); anything else is a 503.
#[derive(Default)]
struct FakeSite {
    pages: HashMap<(String, String), String>,
    requests: Vec<(String, String)>,
}

impl FakeSite {
    fn add(&mut self, topic: &str, page_no: u32, html: String) {
        self.pages.insert((topic.to_string(), page_no.to_string()), html);
    }
}

impl PageSource for FakeSite {
    fn fetch(&mut self, path: &str, query: &[(&str, String)]) -> Result<String> {
        assert_eq!(path, "/works/search");
        let get = |k: &str| query.iter().find(|(name, _)| *name == k).map(|(_, v)| v.clone()).unwrap_or_default();
        assert_eq!(get("work_search[sort_column]"), "kudos_count");
        let key = (get("work_search[query]"), get("page"));
        self.requests.push(key.clone());
        self.pages.get(&key).cloned().ok_or(Error::Http {
            status: 503,
            url: format!("https://archiveofourown.org{path}?page={}", key.1),
        })
    }
}

fn site() -> FakeSite {
    let mut site = FakeSite::default();
    site.add(
        "Sherlock",
        1,
        page(
            &[
                blurb("Sherlock", &Row { id: 1, title: "Pink", author: "a1", rating: "Teen And Up Audiences", category: "M/M", words: "5,000", kudos: "150", hits: "1,000" }),
                blurb("Sherlock", &Row { id: 2, title: "Blind Banker", author: "a2", rating: "General Audiences", category: "Gen", words: "3,000", kudos: "80", hits: "600" }),
            ],
            true,
        ),
    );
    site.add(
        "Sherlock",
        2,
        page(&[blurb("Sherlock", &Row { id: 3, title: "Great Game", author: "a1", rating: "Mature", category: "M/M", words: "12,000", kudos: "400", hits: "3,000" })], false),
    );
    site.add(
        "Star Trek",
        1,
        page(&[blurb("Star Trek", &Row { id: 4, title: "Final Frontier", author: "b1", rating: "Teen And Up Audiences", category: "F/M", words: "8,000", kudos: "200", hits: "1,500" })], true),
    );
    // Star Trek page 2 is missing → request fails, topic stops.
    site
}

#[test]
fn crawl_save_reload_report() {
    let mut site = site();
    let scrape_opts = ScrapeOptions {
        topics: vec!["Sherlock".into(), "Star Trek".into(), "Nothing Here".into()],
        max_pages: 3,
        ..ScrapeOptions::default()
    };

    let mut progress = NullProgress;
    let ds = scrape::collect(&mut site, &scrape_opts, Some(&mut progress));

    // Sherlock stops at page 2 (no next link); Star Trek at its failed page 2;
    // "Nothing Here" fails on page 1 and contributes nothing.
    assert_eq!(
        site.requests,
        vec![
            ("Sherlock".to_string(), "1".to_string()),
            ("Sherlock".to_string(), "2".to_string()),
            ("Star Trek".to_string(), "1".to_string()),
            ("Star Trek".to_string(), "2".to_string()),
            ("Nothing Here".to_string(), "1".to_string()),
        ]
    );
    assert_eq!(ds.len(), 4);
    let ids: Vec<&str> = ds.works.iter().map(|w| w.work_id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3", "4"]);
    assert_eq!(ds.works[2].words, 12000);
    assert_eq!(ds.works[3].fandom_searched, "Star Trek");
    assert_eq!(ds.works[0].tags, vec!["Fluff".to_string(), "Hurt/Comfort".to_string()]);

    let tmp = tempfile::tempdir().unwrap();
    let mut opts = AppOptions::default();
    opts.export.set_dir(tmp.path().join("data"));
    opts.export.format = ExportFormat::Csv;
    let written = store::save_snapshot(&opts.export, &ds).unwrap();
    assert_eq!(written.len(), 2);

    let reloaded = store::load(&opts.analysis_input()).unwrap();
    assert_eq!(reloaded, ds);

    let summary = stats::summary(&reloaded.works);
    assert_eq!(summary.total_works, 4);
    assert_eq!(summary.unique_authors, 3);
    assert_eq!(summary.total_words, 28000);
    assert_eq!(summary.by_topic, vec![("Sherlock".to_string(), 3), ("Star Trek".to_string(), 1)]);

    let text = report::full_report(&reloaded.works, 2);
    assert!(text.contains("Total Works: 4\n"));
    assert!(text.contains("Total Words: 28,000\n"));
    assert!(text.contains("Complete Works: 100.0%\n"));
    assert!(text.contains("Top 2 by Kudos:\n     400 kudos - Great Game by a1\n     200 kudos - Final Frontier by b1\n"));
}

#[test]
fn all_failures_yield_empty_snapshot() {
    let mut site = FakeSite::default();
    let scrape_opts = ScrapeOptions { topics: vec!["Sherlock".into()], max_pages: 2, ..ScrapeOptions::default() };
    let ds = scrape::collect(&mut site, &scrape_opts, None);
    assert!(ds.is_empty());
    assert_eq!(site.requests.len(), 1);

    let tmp = tempfile::tempdir().unwrap();
    let mut opts = AppOptions::default();
    opts.export.set_dir(tmp.path());
    let written = store::save_snapshot(&opts.export, &ds).unwrap();
    assert_eq!(written, vec![opts.export.json_path()]);
    assert!(store::load(&opts.export.json_path()).unwrap().is_empty());
}
