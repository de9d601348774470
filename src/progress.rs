// src/progress.rs
/// Lightweight progress reporting used by long-running operations (scrape).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the upper bound on pages to fetch.
    fn begin(&mut self, _total_pages: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One listing page fetched and parsed.
    fn page_done(&mut self, _topic: &str, _page: u32, _works: usize) {}

    /// Fetching a page failed; the topic's crawl stops here.
    fn page_failed(&mut self, _topic: &str, _page: u32, _err: &str) {}

    /// A topic ended early (failed page, no results or no next page).
    /// `skipped` pages won't be fetched.
    fn topic_done(&mut self, _topic: &str, _collected: usize, _skipped: u32) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
