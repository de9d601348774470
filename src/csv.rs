// src/csv.rs
//
// CSV/TSV plumbing on top of the `csv` crate: one place that knows the
// writer/reader settings for the work table.

use std::{fs::File, io, path::Path};

use ::csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};

use crate::error::{Error, Result};
use crate::file::ensure_parent;

/* ---------------- Writing ---------------- */

/// Header row is written by serde from the record's field names.
pub fn writer_for<W: io::Write>(w: W, delim: u8) -> ::csv::Writer<W> {
    WriterBuilder::new()
        .delimiter(delim)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .has_headers(true)
        .from_writer(w)
}

/// Create/truncate `path` (parents included) and hand back a writer.
pub fn create(path: &Path, delim: u8) -> Result<::csv::Writer<File>> {
    ensure_parent(path)?;
    let f = File::create(path).map_err(|e| Error::file(path, e))?;
    Ok(writer_for(f, delim))
}

/* ---------------- Parsing ---------------- */

/// Quotes + CRLF tolerant; rows with a short/long field count are still read
/// (missing trailing cells deserialize via serde defaults where allowed).
pub fn reader_for<R: io::Read>(r: R, delim: u8) -> ::csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(true)
        .flexible(true)
        .trim(::csv::Trim::None)
        .from_reader(r)
}

pub fn open(path: &Path, delim: u8) -> Result<::csv::Reader<File>> {
    let f = File::open(path).map_err(|e| Error::file(path, e))?;
    Ok(reader_for(f, delim))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row { a: String, b: u32 }

    #[test]
    fn quotes_only_when_needed() {
        let mut buf = Vec::new();
        {
            let mut w = writer_for(&mut buf, b',');
            w.serialize(Row { a: s!("plain"), b: 1 }).unwrap();
            w.serialize(Row { a: s!("has, comma \"q\""), b: 2 }).unwrap();
            w.flush().unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "a,b\nplain,1\n\"has, comma \"\"q\"\"\",2\n");
    }

    #[test]
    fn tsv_reads_back() {
        let text = "a\tb\r\nx, y\t3\r\n";
        let mut r = reader_for(text.as_bytes(), b'\t');
        let rows: Vec<Row> = r.deserialize().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(rows, vec![Row { a: s!("x, y"), b: 3 }]);
    }
}
