// src/errors.rs

use thiserror::Error;

/// Errors surfaced by the annotation pipeline.
///
/// Column lookups that fail are configuration problems (wrong input file
/// or renamed header); read/write failures carry the offending path so a
/// batch run's diagnostic names the file that broke. Missing fields inside
/// otherwise well-formed rows are never an error: they normalize to the
/// empty string and processing continues.
#[derive(Debug, Error)]
pub enum ToxError {
    #[error("required column '{0}' not found")]
    MissingColumn(String),

    #[error("could not read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not a tab-separated table with a header line")]
    EmptyTable { path: String },
}
