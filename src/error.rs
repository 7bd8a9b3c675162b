//! Error type shared by the aggregator and the estimator.

use std::path::PathBuf;

/// Errors that abort an aggregation or scoring run.
///
/// Malformed descriptor rows are not represented here: they are skipped
/// and only show up in [`crate::AggregateSummary::skipped`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read descriptor table {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}:{line}: malformed count line {content:?} (expected \"<count> <word>\")", path.display())]
    MalformedCountLine {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("invalid category groups: {0}")]
    InvalidCategories(String),

    #[error("cannot score word {word:?}: {reason}")]
    DegenerateWord { word: String, reason: String },

    #[error("CSV export failed: {0}")]
    Export(#[source] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
