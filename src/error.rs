use std::path::PathBuf;

/// Errors raised at the crate's I/O boundary.
///
/// The selection/filter/aggregation pipeline itself never fails; missing data
/// is expressed through `Selection::None`, empty tables, and `Option` values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error")]
    Csv(#[from] csv::Error),
    #[error("json error")]
    Json(#[from] serde_json::Error),
    #[error("io error")]
    Io(#[from] std::io::Error),
    #[error("line {line}: cannot read a 4-digit year from {raw:?}")]
    Year { line: u64, raw: String },
    #[error("line {line}: column {column} is not a number: {raw:?}")]
    Number {
        line: u64,
        column: &'static str,
        raw: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
