use thiserror::Error;

#[derive(Error, Debug)]
pub enum LmError {
    #[error("No language model matches the selector")]
    NoModel,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed stream event: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Missing API key: environment variable {0} is not set")]
    MissingApiKey(String),
}

pub type Result<T> = std::result::Result<T, LmError>;
