use crate::error::GitHubError;
use crate::error::Result;
use std::path::Path;
use std::process::Command;
use tracing::debug;
use tracing::warn;
use url::Url;

const GITHUB_HOST: &str = "github.com";

/// A repository on a GitHub (or GitHub Enterprise) host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(host: impl Into<String>, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name` on github.com.
    pub fn from_slug(slug: &str) -> Result<Self> {
        match slug.trim_matches('/').split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(GITHUB_HOST, owner, name.trim_end_matches(".git")))
            }
            _ => Err(GitHubError::InvalidRemote(slug.to_string())),
        }
    }

    /// Parse `https://host/owner/name(.git)`, `ssh://git@host/owner/name`
    /// or `git@host:owner/name(.git)`.
    pub fn from_remote_url(remote: &str) -> Result<Self> {
        let remote = remote.trim();
        let invalid = || GitHubError::InvalidRemote(remote.to_string());

        let (host, path) = if remote.contains("://") {
            let url = Url::parse(remote).map_err(|_| invalid())?;
            let host = url.host_str().ok_or_else(invalid)?.to_string();
            (host, url.path().to_string())
        } else {
            let (user_host, path) = remote.split_once(':').ok_or_else(invalid)?;
            let host = user_host.rsplit('@').next().unwrap_or(user_host);
            (host.to_string(), path.to_string())
        };

        let mut segments = path
            .trim_matches('/')
            .trim_end_matches(".git")
            .split('/')
            .filter(|segment| !segment.is_empty());
        match (segments.next(), segments.next(), segments.next()) {
            (Some(owner), Some(name), None) if !host.is_empty() => {
                Ok(Self::new(host, owner, name))
            }
            _ => Err(invalid()),
        }
    }

    /// REST endpoint for the repository host.
    pub fn api_base_url(&self) -> String {
        if self.host == GITHUB_HOST {
            "https://api.github.com".to_string()
        } else {
            format!("https://{}/api/v3", self.host)
        }
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Repository behind the `origin` remote of the git checkout at `root`.
pub fn discover_repo(root: &Path) -> Option<RepoRef> {
    let output = match Command::new("git")
        .args(["remote", "get-url", "origin"])
        .current_dir(root)
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            warn!("git remote lookup failed: {err}");
            return None;
        }
    };
    if !output.status.success() {
        debug!("no origin remote in {}", root.display());
        return None;
    }

    let remote = String::from_utf8_lossy(&output.stdout);
    match RepoRef::from_remote_url(&remote) {
        Ok(repo) => Some(repo),
        Err(err) => {
            warn!("{err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_https_remote() {
        let repo = RepoRef::from_remote_url("https://github.com/adobe/aem-boilerplate.git").unwrap();
        assert_eq!(repo, RepoRef::new("github.com", "adobe", "aem-boilerplate"));
        assert_eq!(repo.api_base_url(), "https://api.github.com");
    }

    #[test]
    fn test_ssh_remotes() {
        let repo = RepoRef::from_remote_url("git@github.com:adobe/aem-block-collection.git\n").unwrap();
        assert_eq!(repo.slug(), "adobe/aem-block-collection");

        let repo = RepoRef::from_remote_url("ssh://git@git.corp.example/team/site").unwrap();
        assert_eq!(repo.host, "git.corp.example");
        assert_eq!(repo.api_base_url(), "https://git.corp.example/api/v3");
    }

    #[test]
    fn test_invalid_remotes() {
        assert!(RepoRef::from_remote_url("not a remote").is_err());
        assert!(RepoRef::from_remote_url("https://github.com/adobe").is_err());
        assert!(RepoRef::from_remote_url("https://github.com/a/b/c").is_err());
    }

    #[test]
    fn test_slug() {
        assert_eq!(
            RepoRef::from_slug("adobe/aem-boilerplate").unwrap(),
            RepoRef::new("github.com", "adobe", "aem-boilerplate")
        );
        assert!(RepoRef::from_slug("adobe").is_err());
    }
}
