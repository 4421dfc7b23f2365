use crate::models::Column;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to ingest {source_name}: {reason}")]
    Ingest { source_name: String, reason: String },

    #[error("Required column '{column}' missing from {source_name}")]
    MissingColumn { source_name: String, column: String },

    #[error("Cannot compute {operation} over an empty dataset")]
    EmptyDataset { operation: &'static str },

    #[error("Insufficient data to correlate {left} and {right}: {observations} paired observations")]
    InsufficientData {
        left: Column,
        right: Column,
        observations: usize,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ReportError {
    pub fn ingest(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::Ingest {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_column(source_name: impl Into<String>, column: impl Into<String>) -> Self {
        ReportError::MissingColumn {
            source_name: source_name.into(),
            column: column.into(),
        }
    }

    /// True for failures that abort loading a source.
    pub fn is_ingest(&self) -> bool {
        matches!(
            self,
            ReportError::Ingest { .. }
                | ReportError::MissingColumn { .. }
                | ReportError::Validation(_)
        )
    }
}
