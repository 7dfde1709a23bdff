use serde::Deserialize;
use serde::Serialize;

/// How candidate pages are ordered before they reach the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingStrategy {
    /// Every query term must appear; earliest match first.
    #[default]
    TermOverlap,
    /// The language model picks and orders page paths.
    Model,
}

/// Configuration for documentation search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Location of the documentation index JSON
    #[serde(default = "default_index_url")]
    pub index_url: String,

    /// Prefix joined with each index path to build page URLs
    #[serde(default = "default_site_base_url")]
    pub site_base_url: String,

    /// Result limit when the caller does not pass one
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Number of pages injected into a docs answer
    #[serde(default = "default_answer_limit")]
    pub answer_limit: usize,

    #[serde(default)]
    pub ranking_strategy: RankingStrategy,

    /// Paths requested from the model ranker
    #[serde(default = "default_model_top_k")]
    pub model_top_k: usize,

    /// Drop model-ranked paths scoring below this value (or without a score)
    #[serde(default)]
    pub min_relevance_score: Option<f32>,
}

fn default_index_url() -> String {
    "https://www.aem.live/docpages-index.json".to_string()
}

fn default_site_base_url() -> String {
    "https://www.aem.live".to_string()
}

fn default_limit() -> usize {
    4
}

fn default_answer_limit() -> usize {
    2
}

fn default_model_top_k() -> usize {
    20
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_url: default_index_url(),
            site_base_url: default_site_base_url(),
            default_limit: default_limit(),
            answer_limit: default_answer_limit(),
            ranking_strategy: RankingStrategy::default(),
            model_top_k: default_model_top_k(),
            min_relevance_score: None,
        }
    }
}

impl SearchConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.index_url.trim().is_empty() {
            return Err("index_url must not be empty".to_string());
        }

        if self.default_limit == 0 || self.answer_limit == 0 {
            return Err("result limits must be > 0".to_string());
        }

        if self.model_top_k == 0 {
            return Err("model_top_k must be > 0".to_string());
        }

        if let Some(score) = self.min_relevance_score
            && !(0.0..=1.0).contains(&score)
        {
            return Err(format!(
                "min_relevance_score must be in [0.0, 1.0], got {score}"
            ));
        }

        Ok(())
    }
}
