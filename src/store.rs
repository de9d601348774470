// src/store.rs
//
// Snapshot files: one delimited table + one JSON array per run.
// Nothing is merged or updated in place; a save overwrites.

use std::{fs::File, io::{BufReader, BufWriter, Write}, path::{Path, PathBuf}};

use tracing::{info, warn};

use crate::config::options::{ExportFormat, ExportOptions};
use crate::error::{Error, Result};
use crate::file::ensure_parent;
use crate::model::{Work, WorkRecord};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSet {
    pub works: Vec<Work>,
}

impl DataSet {
    pub fn len(&self) -> usize { self.works.len() }
    pub fn is_empty(&self) -> bool { self.works.is_empty() }
}

/// Header + one row per work. Returns false (and writes nothing) for an empty set.
pub fn save_table(path: &Path, works: &[Work], format: ExportFormat) -> Result<bool> {
    if works.is_empty() {
        warn!("No data to save");
        return Ok(false);
    }
    let mut w = crate::csv::create(path, format.delim())?;
    for work in works {
        w.serialize(WorkRecord::from(work))?;
    }
    w.flush().map_err(|e| Error::file(path, e))?;
    info!("Saved {} works to {}", works.len(), path.display());
    Ok(true)
}

/// Pretty JSON array; non-ASCII stays as-is. An empty set writes `[]`.
pub fn save_json(path: &Path, works: &[Work]) -> Result<()> {
    ensure_parent(path)?;
    let f = File::create(path).map_err(|e| Error::file(path, e))?;
    let mut out = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut out, works)?;
    out.write_all(b"\n").map_err(|e| Error::file(path, e))?;
    out.flush().map_err(|e| Error::file(path, e))?;
    info!("Saved {} works to {}", works.len(), path.display());
    Ok(())
}

pub fn load_table(path: &Path, format: ExportFormat) -> Result<Vec<Work>> {
    let mut r = crate::csv::open(path, format.delim())?;
    let mut works = Vec::new();
    for rec in r.deserialize::<WorkRecord>() {
        works.push(Work::from(rec?));
    }
    Ok(works)
}

pub fn load_json(path: &Path) -> Result<Vec<Work>> {
    let f = File::open(path).map_err(|e| Error::file(path, e))?;
    Ok(serde_json::from_reader(BufReader::new(f))?)
}

/// Load by extension: `.json` → JSON, `.tsv` → TSV, anything else → CSV.
pub fn load(path: &Path) -> Result<DataSet> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let works = if is_json {
        load_json(path)?
    } else {
        load_table(path, ExportFormat::from_path(path))?
    };
    Ok(DataSet { works })
}

/// Write both serializations per export options. Returns paths actually written.
pub fn save_snapshot(export: &ExportOptions, ds: &DataSet) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(2);
    let table = export.table_path();
    if save_table(&table, &ds.works, export.format)? {
        written.push(table);
    }
    let json = export.json_path();
    save_json(&json, &ds.works)?;
    written.push(json);
    Ok(written)
}
