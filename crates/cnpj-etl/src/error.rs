//! Error types for the CNPJ ETL
//!
//! Only fatal, pre-run or pre-row conditions surface as [`EtlError`]; failures
//! inside a single row are contained by the runner and counted, never
//! propagated.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for ETL operations
pub type Result<T> = std::result::Result<T, EtlError>;

/// Fatal error conditions for a pipeline invocation
#[derive(Error, Debug)]
pub enum EtlError {
    /// Source file is missing; aborts before anything is opened
    #[error("File not found: '{0}'. Verify the extract path exists and you have read permissions.")]
    FileNotFound(PathBuf),

    /// Declared header present but required columns are absent
    #[error("Missing required columns in CSV header: {missing:?}. The file layout does not match the '{entity}' extract.")]
    MissingColumns {
        entity: &'static str,
        missing: Vec<String>,
    },

    /// The file does not match its declared encoding
    #[error("Invalid {encoding} byte sequence at line {line}. Source extracts must match their declared encoding.")]
    Decode { encoding: &'static str, line: u64 },

    /// Structural CSV read failure (I/O or malformed quoting)
    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// Database operation failed outside the per-row unit of work
    #[error("Database error: {0}. Check your DATABASE_URL and that Postgres is reachable.")]
    Database(#[from] sqlx::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or .env file.")]
    Config(String),
}

impl EtlError {
    /// Create a configuration error from any displayable value
    pub fn config(msg: impl std::fmt::Display) -> Self {
        EtlError::Config(msg.to_string())
    }
}
