use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unrecognised remote url: {0}")]
    InvalidRemote(String),

    #[error("repository not configured and no git remote found")]
    NoRepository,

    #[error("GitHub token missing (set {0})")]
    MissingToken(String),
}

pub type Result<T> = std::result::Result<T, GitHubError>;
