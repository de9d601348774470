// src/config/consts.rs
use std::time::Duration;

// Net config
pub const BASE_URL: &str = "https://archiveofourown.org";
pub const SEARCH_PATH: &str = "/works/search";
pub const USER_AGENT: &str =
    "Mozilla/5.0 (compatible; FandomResearchBot/1.0; Educational Research Project)";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const REQUEST_DELAY_SECS: f64 = 5.0; // be polite
pub const SORT_COLUMN: &str = "kudos_count";

// Scrape
pub const DEFAULT_MAX_PAGES: u32 = 3;
pub const DEFAULT_TOPICS: [&str; 4] = [
    "My Chemical Romance",
    "Fall Out Boy",
    "Sherlock",
    "Star Trek",
];

// Extraction limits
pub const SUMMARY_MAX_CHARS: usize = 200;
pub const MAX_TAGS: usize = 10;
pub const MAX_RELATIONSHIPS: usize = 5;
pub const MAX_CHARACTERS: usize = 10;
pub const LIST_SEP: &str = ", ";

// Field defaults when the blurb doesn't carry them
pub const DEFAULT_AUTHOR: &str = "Anonymous";
pub const DEFAULT_RATING: &str = "Not Rated";
pub const DEFAULT_WARNINGS: &str = "No Archive Warnings Apply";
pub const DEFAULT_CATEGORY: &str = "N/A";
pub const DEFAULT_LANGUAGE: &str = "English";
pub const DEFAULT_CHAPTERS: &str = "1/1";

// Local store
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
pub const SETTINGS_FILE: &str = "fic_scrape.cfg";

// Export
pub const DEFAULT_OUT_DIR: &str = "data";
pub const DEFAULT_FILE: &str = "ao3_fanfictions";

// Analysis
pub const DEFAULT_CHARTS_DIR: &str = "outputs";
pub const DEFAULT_TOP_N: usize = 10;
pub const HISTOGRAM_BINS: usize = 50;
pub const TITLE_MAX_CHARS: usize = 50;
