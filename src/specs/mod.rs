//! # Scraping “specs” module
//!
//! Page-specific extraction rules for the archive. Each spec encodes *where
//! the ground truth lives in the HTML* for one kind of page and turns it into
//! typed records.
//!
//! ## What lives here
//! - **Pure HTML parsing** of already-fetched markup (no network).
//! - **Selector choice & precedence** (e.g. a symbol span's `title` attribute
//!   beats its abbreviated inner text; fandom tag links beat bare heading text).
//! - **Tolerant extraction**: a missing field gets its default and the record
//!   survives. Only a blurb with no title link is dropped.
//!
//! ## What does **not** live here
//! - Fetching and pacing (`core::net`), crawl order and stopping rules
//!   (`scrape`), persistence (`store`), statistics (`analysis`).
//!
//! ## Typical call chain
//! ```text
//! cli → scrape::collect → core::net::PageSource::fetch
//!                       → specs::works::parse_listing → Vec<Work>
//!     → store::save_table / store::save_json
//! ```
//!
//! ## Testing notes
//! Specs are tested offline against inline fixtures shaped like real pages.
pub mod works;
