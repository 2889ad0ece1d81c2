use thiserror::Error;

/// Infrastructure failures. Never used to signal a business-rule rejection.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Request to database failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Database returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode database response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid database configuration: {0}")]
    Configuration(String),

    #[error("Database returned no rows for {0}")]
    EmptyResult(String),
}
