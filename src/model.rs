// src/model.rs
//
// The one entity: a Work as seen on a listing page.
// JSON uses `Work` directly (lists stay arrays). The delimited table uses
// `WorkRecord`, where lists are joined with ", ".

use serde::{Deserialize, Serialize};

use crate::config::consts::LIST_SEP;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    /// Topic (search term) that surfaced this work.
    pub fandom_searched: String,
    pub title: String,
    pub work_id: String,
    pub author: String,
    pub rating: String,
    pub warnings: String,
    pub category: String,
    pub fandoms: Vec<String>,
    pub tags: Vec<String>,
    pub relationships: Vec<String>,
    pub characters: Vec<String>,
    pub language: String,
    pub words: u64,
    /// Progress string as shown on the site: "3/10", "1/?".
    pub chapters: String,
    pub kudos: u64,
    pub bookmarks: u64,
    pub hits: u64,
    pub summary: String,
}

impl Work {
    /// "n/n" is complete; "n/?" or "n/m" with n < m is a work in progress.
    /// Unparsable strings count as incomplete.
    pub fn is_complete(&self) -> bool {
        let Some((posted, planned)) = self.chapters.split_once('/') else { return false };
        match (posted.trim().parse::<u32>(), planned.trim().parse::<u32>()) {
            (Ok(p), Ok(t)) => p == t,
            _ => false,
        }
    }

    /// kudos / (hits + 1), so unviewed works don't divide by zero.
    pub fn kudos_hit_ratio(&self) -> f64 {
        self.kudos as f64 / (self.hits as f64 + 1.0)
    }
}

/// Flat row shape for CSV/TSV. Column order = field order.
/// Short rows read back with blanks/zeros for the missing cells.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkRecord {
    pub fandom_searched: String,
    pub title: String,
    pub work_id: String,
    pub author: String,
    pub rating: String,
    pub warnings: String,
    pub category: String,
    pub fandoms: String,
    pub tags: String,
    pub relationships: String,
    pub characters: String,
    pub language: String,
    #[serde(deserialize_with = "count_or_zero")]
    pub words: u64,
    pub chapters: String,
    #[serde(deserialize_with = "count_or_zero")]
    pub kudos: u64,
    #[serde(deserialize_with = "count_or_zero")]
    pub bookmarks: u64,
    #[serde(deserialize_with = "count_or_zero")]
    pub hits: u64,
    pub summary: String,
}

pub const COLUMNS: [&str; 18] = [
    "fandom_searched", "title", "work_id", "author", "rating", "warnings",
    "category", "fandoms", "tags", "relationships", "characters", "language",
    "words", "chapters", "kudos", "bookmarks", "hits", "summary",
];

impl From<&Work> for WorkRecord {
    fn from(w: &Work) -> Self {
        Self {
            fandom_searched: w.fandom_searched.clone(),
            title: w.title.clone(),
            work_id: w.work_id.clone(),
            author: w.author.clone(),
            rating: w.rating.clone(),
            warnings: w.warnings.clone(),
            category: w.category.clone(),
            fandoms: w.fandoms.join(LIST_SEP),
            tags: w.tags.join(LIST_SEP),
            relationships: w.relationships.join(LIST_SEP),
            characters: w.characters.join(LIST_SEP),
            language: w.language.clone(),
            words: w.words,
            chapters: w.chapters.clone(),
            kudos: w.kudos,
            bookmarks: w.bookmarks,
            hits: w.hits,
            summary: w.summary.clone(),
        }
    }
}

impl From<WorkRecord> for Work {
    fn from(r: WorkRecord) -> Self {
        Self {
            fandom_searched: r.fandom_searched,
            title: r.title,
            work_id: r.work_id,
            author: r.author,
            rating: r.rating,
            warnings: r.warnings,
            category: r.category,
            fandoms: split_list(&r.fandoms),
            tags: split_list(&r.tags),
            relationships: split_list(&r.relationships),
            characters: split_list(&r.characters),
            language: r.language,
            words: r.words,
            chapters: r.chapters,
            kudos: r.kudos,
            bookmarks: r.bookmarks,
            hits: r.hits,
            summary: r.summary,
        }
    }
}

/// Inverse of `join(", ")`, minus empty items.
/// Lossy for items that themselves contain commas.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

// Blank or junk count cells in hand-edited tables read as 0.
fn count_or_zero<'de, D>(de: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(de)?;
    Ok(crate::core::sanitize::parse_count(&raw))
}
