use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlockError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("block `{0}` not found in collection")]
    NotFound(String),

    #[error("invalid block template: {0}")]
    Template(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BlockError>;
