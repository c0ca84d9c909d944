#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Another document retrieval is in progress: {pending}")]
    Busy { pending: String },

    #[error("Document transfer failed: {0}")]
    Transfer(String),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
