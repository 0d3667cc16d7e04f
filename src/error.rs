use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the caller of the ranking engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// The candidate profile cannot be ranked: non-positive rank, an
    /// unrecognized category or gender pool, or an empty preference set.
    #[error("invalid candidate profile: {0}")]
    InvalidProfile(String),
}

/// Errors while reading a seat table from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot parse HTML table in {path}: {reason}")]
    Html { path: PathBuf, reason: String },

    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: unsupported table format (expected .csv, .html or .htm)")]
    UnsupportedFormat { path: PathBuf },
}

/// Errors while persisting a recommendation session.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The master log exists but is not a `{"sessions": [...]}` document.
    #[error("master log {path} is corrupt: {reason}")]
    CorruptLog { path: PathBuf, reason: String },
}
