use std::path::PathBuf;

/// Errors from the ingestion layer and the interactive front end. The
/// collections themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The CSV file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading the CSV file failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Console input or output failed.
    #[error(transparent)]
    Console(#[from] std::io::Error),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// A query was issued before any records were loaded.
    #[error("no records loaded")]
    NotLoaded,
}

pub type Result<T> = std::result::Result<T, Error>;
