//! `config.toml` loading.

use crate::error::CoreError;
use crate::error::Result;
use aem_block_collection::BlockCollectionConfig;
use aem_docs_search::SearchConfig;
use aem_github_issues::GitHubConfig;
use aem_lm_client::ModelProviderConfig;
use aem_lm_client::ModelSelector;
use serde::Deserialize;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::info;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Overrides the configuration directory.
pub const AEM_HOME_ENV_VAR: &str = "AEM_COPILOT_HOME";

/// Top-level configuration. Every section is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AemConfig {
    #[serde(default)]
    pub model: ModelProviderConfig,

    /// Which registered model answers chat requests
    #[serde(default = "default_model_selector")]
    pub model_selector: ModelSelector,

    #[serde(default)]
    pub docs: SearchConfig,

    #[serde(default)]
    pub blocks: BlockCollectionConfig,

    #[serde(default)]
    pub github: GitHubConfig,
}

fn default_model_selector() -> ModelSelector {
    ModelSelector::new("copilot", "gpt-4o")
}

impl Default for AemConfig {
    fn default() -> Self {
        Self {
            model: ModelProviderConfig::default(),
            model_selector: default_model_selector(),
            docs: SearchConfig::default(),
            blocks: BlockCollectionConfig::default(),
            github: GitHubConfig::default(),
        }
    }
}

impl AemConfig {
    /// Load from `path`, or from `<aem home>/config.toml` when `None`. A
    /// missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => find_aem_home()?.join(CONFIG_FILE_NAME),
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };

        let config = Self::from_toml(&contents)?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate().map_err(CoreError::Config)?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        self.model.validate()?;
        self.docs.validate().map_err(|err| format!("docs: {err}"))?;
        self.blocks
            .validate()
            .map_err(|err| format!("blocks: {err}"))?;
        self.github
            .validate()
            .map_err(|err| format!("github: {err}"))?;
        Ok(())
    }
}

/// `$AEM_COPILOT_HOME` when set and non-empty, else `~/.aem-copilot`.
pub fn find_aem_home() -> std::io::Result<PathBuf> {
    if let Ok(env_home) = std::env::var(AEM_HOME_ENV_VAR)
        && !env_home.is_empty()
    {
        return Ok(PathBuf::from(env_home));
    }

    let mut home = dirs::home_dir().ok_or_else(|| {
        std::io::Error::new(ErrorKind::NotFound, "Could not locate home directory")
    })?;
    home.push(".aem-copilot");
    Ok(home)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aem_docs_search::RankingStrategy;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AemConfig::load(Some(&dir.path().join(CONFIG_FILE_NAME))).unwrap();
        assert_eq!(config, AemConfig::default());
        assert_eq!(config.model_selector, ModelSelector::new("copilot", "gpt-4o"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[model]
base_url = "http://localhost:11434/v1"
model = "llama3"
api_key_env = "LOCAL_KEY"

[docs]
ranking_strategy = "model"
min_relevance_score = 0.4

[github]
repository = "adobe/aem-boilerplate"
"#
        )
        .unwrap();

        let config = AemConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.model.model, "llama3");
        assert_eq!(config.model.family, "gpt-4o");
        assert_eq!(config.docs.ranking_strategy, RankingStrategy::Model);
        assert_eq!(config.docs.answer_limit, 2);
        assert_eq!(
            config.github.repository.as_deref(),
            Some("adobe/aem-boilerplate")
        );
        assert_eq!(config.blocks, BlockCollectionConfig::default());
    }

    #[test]
    fn invalid_values_rejected() {
        let err = AemConfig::from_toml("[docs]\nanswer_limit = 0\n").unwrap_err();
        assert!(matches!(err, CoreError::Config(msg) if msg.starts_with("docs:")));

        assert!(matches!(
            AemConfig::from_toml("[docs\n"),
            Err(CoreError::Toml(_))
        ));
    }
}
