// src/specs/works.rs
//
// Listing page (works search results) → Works.
//
// Blurb shape (abridged):
//   <li class="work blurb group" id="work_123">
//     <h4 class="heading"><a href="/works/123">Title</a> by <a rel="author">Name</a></h4>
//     <h5 class="fandoms heading"><a class="tag">Fandom</a>, …</h5>
//     <ul class="required-tags"> span.rating / span.warnings / span.category </ul>
//     <ul class="tags"> li.relationships / li.characters / li.freeforms </ul>
//     <blockquote class="summary">…</blockquote>
//     <dl class="stats"> dd.language / dd.words / dd.chapters / dd.kudos / … </dl>
//   </li>

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::consts::*;
use crate::core::html::{all_texts, first_attr, first_text, first_title_or_text, text_of};
use crate::core::sanitize::{last_path_segment, parse_count, truncate_chars};
use crate::model::Work;

pub struct ListingPage {
    pub works: Vec<Work>,
    /// Pagination offers an enabled "Next" link.
    pub has_next: bool,
    /// Blurbs seen, including ones skipped for lacking a title.
    pub blurbs: usize,
}

struct Selectors {
    blurb: Selector,
    title_link: Selector,
    author: Selector,
    rating: Selector,
    warnings: Selector,
    category: Selector,
    fandom_tags: Selector,
    fandoms_heading: Selector,
    freeforms: Selector,
    relationships: Selector,
    characters: Selector,
    stats: Selector,
    language: Selector,
    words: Selector,
    chapters: Selector,
    kudos: Selector,
    bookmarks: Selector,
    hits: Selector,
    summary: Selector,
    next_link: Selector,
}

fn css(s: &str) -> Selector {
    // Literals below are fixed and valid; a parse failure is a programming error.
    Selector::parse(s).unwrap_or_else(|e| panic!("bad selector {s:?}: {e}"))
}

static SEL: LazyLock<Selectors> = LazyLock::new(|| Selectors {
    blurb: css("li.work.blurb.group"),
    title_link: css("h4.heading a"),
    author: css(r#"a[rel="author"]"#),
    rating: css("span.rating"),
    warnings: css("span.warnings"),
    category: css("span.category"),
    fandom_tags: css("h5.fandoms a.tag"),
    fandoms_heading: css("h5.fandoms"),
    freeforms: css("li.freeforms"),
    relationships: css("li.relationships"),
    characters: css("li.characters"),
    stats: css("dl.stats"),
    language: css("dd.language"),
    words: css("dd.words"),
    chapters: css("dd.chapters"),
    kudos: css("dd.kudos"),
    bookmarks: css("dd.bookmarks"),
    hits: css("dd.hits"),
    summary: css("blockquote.summary"),
    next_link: css(r#"ol.pagination li.next a, a[rel="next"]"#),
});

/// Parse one search-results page. Never fails: an unrecognised page is
/// simply a page with no works and no next link.
pub fn parse_listing(html: &str, topic: &str) -> ListingPage {
    let doc = Html::parse_document(html);
    let sel = &*SEL;

    let mut works = Vec::new();
    let mut blurbs = 0usize;
    for blurb in doc.select(&sel.blurb) {
        blurbs += 1;
        match parse_blurb(blurb, topic) {
            Some(w) => works.push(w),
            None => debug!(
                "{topic}: skipping blurb without title ({})",
                blurb.value().id().unwrap_or("no id")
            ),
        }
    }

    let has_next = doc.select(&sel.next_link).next().is_some();
    ListingPage { works, has_next, blurbs }
}

/// One blurb → Work. `None` only when there is no title link; every other
/// missing field falls back to its default.
pub fn parse_blurb(blurb: ElementRef<'_>, topic: &str) -> Option<Work> {
    let sel = &*SEL;

    let title_a = blurb.select(&sel.title_link).next()?;
    let title = text_of(title_a);
    if title.is_empty() {
        return None;
    }
    let work_id = title_a.value().attr("href").map(last_path_segment).unwrap_or_default();

    let author = first_text(blurb, &sel.author).unwrap_or_else(|| s!(DEFAULT_AUTHOR));
    let rating = first_title_or_text(blurb, &sel.rating).unwrap_or_else(|| s!(DEFAULT_RATING));
    let warnings = first_title_or_text(blurb, &sel.warnings).unwrap_or_else(|| s!(DEFAULT_WARNINGS));
    let category = first_title_or_text(blurb, &sel.category).unwrap_or_else(|| s!(DEFAULT_CATEGORY));

    let fandoms = extract_fandoms(blurb, topic);
    let tags = all_texts(blurb, &sel.freeforms, MAX_TAGS);
    let relationships = all_texts(blurb, &sel.relationships, MAX_RELATIONSHIPS);
    let characters = all_texts(blurb, &sel.characters, MAX_CHARACTERS);

    let mut work = Work {
        fandom_searched: s!(topic),
        title,
        work_id,
        author,
        rating,
        warnings,
        category,
        fandoms,
        tags,
        relationships,
        characters,
        language: s!(DEFAULT_LANGUAGE),
        words: 0,
        chapters: s!(DEFAULT_CHAPTERS),
        kudos: 0,
        bookmarks: 0,
        hits: 0,
        summary: first_text(blurb, &sel.summary)
            .map(|s| truncate_chars(&s, SUMMARY_MAX_CHARS))
            .unwrap_or_default(),
    };

    if let Some(stats) = blurb.select(&sel.stats).next() {
        let count = |s: &Selector| first_text(stats, s).map(|t| parse_count(&t)).unwrap_or(0);
        if let Some(lang) = first_text(stats, &sel.language) { work.language = lang; }
        if let Some(ch) = first_text(stats, &sel.chapters) { work.chapters = ch.replace(' ', ""); }
        work.words = count(&sel.words);
        work.kudos = count(&sel.kudos);
        work.bookmarks = count(&sel.bookmarks);
        work.hits = count(&sel.hits);
    }

    Some(work)
}

/// Fandom tag links; older markup has bare text in the heading instead.
fn extract_fandoms(blurb: ElementRef<'_>, topic: &str) -> Vec<String> {
    let sel = &*SEL;
    let tags = all_texts(blurb, &sel.fandom_tags, usize::MAX);
    if !tags.is_empty() {
        return tags;
    }
    if let Some(heading) = first_text(blurb, &sel.fandoms_heading) {
        let bare = heading.trim_start_matches("Fandoms:").trim();
        let list = crate::model::split_list(bare);
        if !list.is_empty() {
            return list;
        }
    }
    vec![s!(topic)]
}

/// href of the "Next" pagination link, if any.
pub fn next_page_href(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    first_attr(doc.root_element(), &SEL.next_link, "href").map(String::from)
}
