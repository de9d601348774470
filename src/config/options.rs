// src/config/options.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub export: ExportOptions,
    pub analysis: AnalysisOptions,
}

impl AppOptions {
    /// Table the analyzer reads: explicit `--input`, else whatever the scraper writes.
    pub fn analysis_input(&self) -> PathBuf {
        self.analysis
            .input
            .clone()
            .unwrap_or_else(|| self.export.table_path())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrapeOptions {
    pub topics: Vec<String>,
    pub max_pages: u32,
    pub delay: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            topics: DEFAULT_TOPICS.iter().map(|t| s!(*t)).collect(),
            max_pages: DEFAULT_MAX_PAGES,
            delay: Duration::from_secs_f64(REQUEST_DELAY_SECS),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> u8 {
        match self { ExportFormat::Csv => b',', ExportFormat::Tsv => b'\t' }
    }

    /// Guess from a file extension; anything unknown reads as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(e) if e.eq_ignore_ascii_case("tsv") => ExportFormat::Tsv,
            _ => ExportFormat::Csv,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    out_path: OutputPath,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            out_path: OutputPath::default(),
        }
    }
}

impl ExportOptions {
    /// `<dir>/<stem>.<csv|tsv>`
    pub fn table_path(&self) -> PathBuf {
        self.with_ext(self.format.ext())
    }

    /// `<dir>/<stem>.json`, always alongside the table.
    pub fn json_path(&self) -> PathBuf {
        self.with_ext("json")
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_path.dir
    }

    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) {
        self.out_path.dir = dir.into();
    }

    /// Parse user text into dir + stem. A pasted extension is ignored; format controls it.
    /// A trailing separator means "directory, keep the stem".
    pub fn set_path(&mut self, text: &str) {
        let s = text.trim();
        if s.is_empty() {
            return;
        }
        let p = PathBuf::from(crate::file::normalize_separators(s));
        if crate::file::looks_like_dir_hint(&p) || p.is_dir() {
            self.out_path.dir = p;
            return;
        }
        if let Some(parent) = p.parent() {
            self.out_path.dir = parent.to_path_buf();
        }
        if let Some(stem) = p.file_stem() {
            self.out_path.file_stem = stem.to_os_string();
        }
    }

    fn with_ext(&self, ext: &str) -> PathBuf {
        let stem = self.out_path.file_stem.to_string_lossy();
        self.out_path.dir.join(join!(stem.as_ref(), ".", ext))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct OutputPath {
    dir: PathBuf,
    file_stem: OsString, // without extension
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: OsString::from(DEFAULT_FILE),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub input: Option<PathBuf>,
    pub charts_dir: PathBuf,
    pub top_n: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            input: None,
            charts_dir: PathBuf::from(DEFAULT_CHARTS_DIR),
            top_n: DEFAULT_TOP_N,
        }
    }
}
