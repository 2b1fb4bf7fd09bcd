use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Artist not found: {0}")]
    ArtistNotFound(String),

    #[error("Comparison requires exactly {expected} artists, got {actual}")]
    ComparisonSelection { expected: usize, actual: usize },

    #[error("Transport failure ({status}): {message}")]
    Transport { status: u16, message: String },

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
