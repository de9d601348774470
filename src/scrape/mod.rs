// src/scrape/mod.rs
mod scrape;

pub use scrape::collect;
pub use scrape::search_query;
pub use scrape::search_topic;
