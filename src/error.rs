use thiserror::Error;

use crate::models::SectionKey;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("invalid import payload: {0}")]
    InvalidImport(String),

    #[error("invalid value for section '{section}': {reason}")]
    InvalidSection { section: SectionKey, reason: String },

    #[error("unknown section: {0}")]
    UnknownSection(String),

    #[error("section '{section}' has no field '{field}'")]
    UnknownField { section: SectionKey, field: String },

    #[error("no {list} record with id '{id}'")]
    RecordNotFound { list: &'static str, id: String },

    #[error("unknown export format: {0}")]
    UnknownFormat(String),

    #[error("pdf generation failed: {0}")]
    Pdf(String),

    #[error("storage unavailable: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, DocError>;
