use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Reset not confirmed; nothing was changed")]
    ResetNotConfirmed,

    #[error("Reset failed: {0}")]
    Reset(String),
}

pub type Result<T> = std::result::Result<T, Error>;
