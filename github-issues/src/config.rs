use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// REST endpoint; derived from the repository host when unset
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// `owner/name`; discovered from the `origin` remote when unset
    #[serde(default)]
    pub repository: Option<String>,

    /// Environment variable holding the access token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Issues shown by the list intent
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_list_limit() -> usize {
    5
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            repository: None,
            token_env: default_token_env(),
            list_limit: default_list_limit(),
        }
    }
}

impl GitHubConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.list_limit == 0 || self.list_limit > 100 {
            return Err(format!(
                "list_limit must be in 1..=100, got {}",
                self.list_limit
            ));
        }
        if let Some(repository) = &self.repository
            && repository.split('/').filter(|part| !part.is_empty()).count() != 2
        {
            return Err(format!("repository must be `owner/name`, got {repository}"));
        }
        Ok(())
    }

    /// Token from the configured environment variable, if set and non-empty.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}
