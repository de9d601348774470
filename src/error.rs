// src/error.rs
//! Crate-wide error type.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Server answered, but not with a 2xx.
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// Transport-level failure (DNS, TLS, timeout, body read).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Plotters drawing errors are generic over the backend, so they are flattened to text.
    #[error("chart {chart}: {message}")]
    Chart { chart: String, message: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::File { path: path.into(), source }
    }

    pub fn chart(chart: &str, err: impl std::fmt::Display) -> Self {
        Error::Chart { chart: s!(chart), message: err.to_string() }
    }
}
