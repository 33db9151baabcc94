use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubtransError {
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Unauthorized or not found: {0}")]
    Unauthorized(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Translation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SubtransError>;
