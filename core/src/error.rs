use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChurnError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Customer '{id}' not found")]
    CustomerNotFound { id: String },

    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Report '{id}' not found")]
    ReportNotFound { id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChurnError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ChurnError::InvalidInput { field, reason: reason.into() }
    }
}

pub type ChurnResult<T> = Result<T, ChurnError>;
