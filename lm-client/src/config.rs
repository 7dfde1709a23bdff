use serde::Deserialize;
use serde::Serialize;

/// Connection settings for an OpenAI-compatible chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProviderConfig {
    /// Base URL up to (not including) `/chat/completions`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name sent in the request body
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key; `None` sends no key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,

    /// Vendor reported to model selection
    #[serde(default = "default_vendor")]
    pub vendor: String,

    /// Family reported to model selection
    #[serde(default = "default_family")]
    pub family: String,

    #[serde(default = "default_max_input_tokens")]
    pub max_input_tokens: usize,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_key_env() -> Option<String> {
    Some("OPENAI_API_KEY".to_string())
}

fn default_vendor() -> String {
    "copilot".to_string()
}

fn default_family() -> String {
    "gpt-4o".to_string()
}

fn default_max_input_tokens() -> usize {
    128_000
}

impl Default for ModelProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            vendor: default_vendor(),
            family: default_family(),
            max_input_tokens: default_max_input_tokens(),
        }
    }
}

impl ModelProviderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("model.base_url must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model.model must not be empty".to_string());
        }
        if self.max_input_tokens == 0 {
            return Err("model.max_input_tokens must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_valid() {
        assert!(ModelProviderConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ModelProviderConfig =
            serde_json::from_str(r#"{"base_url":"http://localhost:11434/v1","api_key_env":null}"#)
                .unwrap();

        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.api_key_env, None);
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn rejects_empty_model() {
        let config = ModelProviderConfig {
            model: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
