use crate::types::Seconds;

/// Errors raised while loading categories or packing them into structures.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("invalid category data at {location}: {reason}")]
    Data { location: String, reason: String },

    #[error("categories exceed the time budget of {budget}s on their own: {}", .categories.join(", "))]
    Capacity {
        budget: Seconds,
        categories: Vec<String>,
    },

    #[error("invalid parameters: {reason}")]
    InvalidParams { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl AllocationError {
    pub(crate) fn data(location: impl Into<String>, reason: impl Into<String>) -> Self {
        AllocationError::Data {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn params(reason: impl Into<String>) -> Self {
        AllocationError::InvalidParams {
            reason: reason.into(),
        }
    }
}
