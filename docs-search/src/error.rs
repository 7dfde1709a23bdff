use thiserror::Error;

/// Errors that can occur during documentation search
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("index request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("index reported an error: {0}")]
    Index(String),

    #[error("malformed index: {0}")]
    MalformedIndex(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model request failed: {0}")]
    Model(#[from] aem_lm_client::LmError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
