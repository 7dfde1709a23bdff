use aem_block_collection::BlockError;
use aem_docs_search::SearchError;
use aem_github_issues::GitHubError;
use aem_lm_client::LmError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("no language model available")]
    ModelUnavailable,

    #[error(transparent)]
    Model(#[from] LmError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Block(#[from] BlockError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// True when the model rejected the request as outside its topic.
    pub fn is_off_topic(&self) -> bool {
        let lm = match self {
            CoreError::Model(err) => err,
            CoreError::Search(SearchError::Model(err)) => err,
            _ => return false,
        };
        matches!(lm, LmError::Status { body, .. } if body.contains("off_topic"))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
