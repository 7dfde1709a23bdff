//! Minimal GitHub issues client used by the `issues` chat command.

mod client;
mod config;
mod error;
mod intent;
mod models;
mod repo;

pub use client::GitHubClient;
pub use config::GitHubConfig;
pub use error::GitHubError;
pub use error::Result;
pub use intent::IssueQuery;
pub use models::Comment;
pub use models::Issue;
pub use models::IssueDetails;
pub use repo::RepoRef;
pub use repo::discover_repo;
