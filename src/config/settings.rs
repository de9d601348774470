// src/config/settings.rs
//
// Optional `key=value` settings file. Supplies defaults; CLI flags override.
// Unknown keys and unparsable values are ignored (logged at debug).

use std::{fs, path::Path, time::Duration};

use tracing::debug;

use super::options::{AppOptions, ExportFormat};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    pub out_dir: Option<String>,
    pub charts_dir: Option<String>,
    pub format: Option<ExportFormat>,
    pub delay_secs: Option<f64>,
    pub max_pages: Option<u32>,
    pub topics: Option<Vec<String>>,
}

impl Settings {
    /// Fold into options. Call before applying CLI flags.
    pub fn apply(&self, opts: &mut AppOptions) {
        if let Some(d) = &self.out_dir { opts.export.set_dir(d.as_str()); }
        if let Some(d) = &self.charts_dir { opts.analysis.charts_dir = d.into(); }
        if let Some(f) = self.format { opts.export.format = f; }
        if let Some(d) = self.delay_secs.and_then(|secs| Duration::try_from_secs_f64(secs).ok()) {
            opts.scrape.delay = d;
        }
        if let Some(n) = self.max_pages { opts.scrape.max_pages = n; }
        if let Some(t) = &self.topics { opts.scrape.topics = t.clone(); }
    }
}

/// Missing file → defaults.
pub fn load(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(text) => parse(&text),
        Err(_) => Settings::default(),
    }
}

pub fn parse(text: &str) -> Settings {
    let mut cfg = Settings::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        let Some((key, val)) = line.split_once('=') else { continue };
        let (key, val) = (key.trim(), val.trim());
        match key {
            "out_dir" => cfg.out_dir = Some(s!(val)),
            "charts_dir" => cfg.charts_dir = Some(s!(val)),
            "format" => cfg.format = match val.to_ascii_lowercase().as_str() {
                "csv" => Some(ExportFormat::Csv),
                "tsv" => Some(ExportFormat::Tsv),
                _ => { debug!("settings: bad format {val:?}"); None }
            },
            "delay" => cfg.delay_secs = match val.parse::<f64>() {
                Ok(secs) if Duration::try_from_secs_f64(secs).is_ok() => Some(secs),
                _ => { debug!("settings: bad delay {val:?}"); None }
            },
            "max_pages" => cfg.max_pages = val.parse().ok(),
            "topics" => {
                let list: Vec<String> = val.split(';')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect();
                if !list.is_empty() { cfg.topics = Some(list); }
            }
            other => debug!("settings: unknown key {other:?}"),
        }
    }
    cfg
}
