use crate::config::SearchConfig;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::json::parse_json_array;
use crate::page::DocPage;
use aem_lm_client::LanguageModel;
use aem_lm_client::collect_text;
use aem_protocol::ChatMessage;
use aem_protocol::PromptProps;
use aem_protocol::assemble_prompt;
use log::debug;
use log::info;
use log::warn;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const RANKER_SYSTEM_TEMPLATE: &str = r#"You are an intelligent assistant that helps users find relevant paths based on their query.
Your goal is to analyze the provided data and return a list of the top {top_k} paths ranked by relevance to the user's query.

**Instructions:**
1. Evaluate relevance based on factors such as title, description, and content fields.
2. Assign a relevance score between 0 and 1 (higher scores indicate higher relevance).
3. Return results as a JSON array in the following format:
   [
       {
           "path": "string",
           "relevance_score": number
       }
   ]
4. Include exactly {top_k} items in the list. If fewer paths are available, include all of them.
5. Ensure the JSON is valid and parsable.

**Example JSON Response:**
[
    {
        "path": "/developer/tutorial",
        "relevance_score": 0.95
    },
    {
        "path": "/docs/go-live-checklist",
        "relevance_score": 0.87
    }
]"#;

/// One entry of the model's ranking.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RankedPath {
    pub path: String,
    #[serde(default)]
    pub relevance_score: Option<f32>,
}

#[derive(Serialize)]
struct PageSummary<'a> {
    title: &'a str,
    path: &'a str,
    description: &'a str,
}

/// Delegates relevance ranking to a language model.
pub struct ModelRanker {
    model: Arc<dyn LanguageModel>,
    top_k: usize,
    min_relevance_score: Option<f32>,
}

impl ModelRanker {
    pub fn new(model: Arc<dyn LanguageModel>, config: &SearchConfig) -> Self {
        Self {
            model,
            top_k: config.model_top_k,
            min_relevance_score: config.min_relevance_score,
        }
    }

    pub fn build_prompt(&self, query: &str, corpus: &Corpus) -> Result<Vec<ChatMessage>> {
        let summaries: Vec<PageSummary<'_>> = corpus
            .pages()
            .iter()
            .map(|page| PageSummary {
                title: &page.title,
                path: &page.path,
                description: &page.description,
            })
            .collect();

        let system = RANKER_SYSTEM_TEMPLATE.replace("{top_k}", &self.top_k.to_string());
        let props = PromptProps::new(query).with_user_context(serde_json::to_string(&summaries)?);
        Ok(assemble_prompt(&system, &props))
    }

    /// Pages the model considers relevant, in model order.
    ///
    /// Unparseable output yields an empty list. A failed model request is an
    /// error. Cancellation keeps whatever text arrived before the signal.
    pub async fn rank(
        &self,
        query: &str,
        corpus: &Corpus,
        cancel: CancellationToken,
    ) -> Result<Vec<DocPage>> {
        let messages = self.build_prompt(query, corpus)?;
        debug!(
            "Asking {} to rank {} pages",
            self.model.info().id,
            corpus.len()
        );

        let stream = self.model.send_request(messages, cancel).await?;
        let response = collect_text(stream).await?;

        let ranked: Vec<RankedPath> = parse_json_array(&response);
        if ranked.is_empty() {
            warn!("Model ranking produced no usable paths");
        }

        let pages = self.select_pages(ranked, corpus);
        info!("Model ranked {} relevant pages", pages.len());
        Ok(pages)
    }

    /// Resolve ranked paths to pages: threshold, unknown and duplicate paths
    /// filtered, capped at `top_k`.
    pub fn select_pages(&self, ranked: Vec<RankedPath>, corpus: &Corpus) -> Vec<DocPage> {
        let mut seen = HashSet::new();
        ranked
            .into_iter()
            .filter(|item| match self.min_relevance_score {
                Some(floor) => item.relevance_score.is_some_and(|score| score >= floor),
                None => true,
            })
            .filter_map(|item| match corpus.find_by_path(&item.path) {
                Some(page) => Some(page),
                None => {
                    debug!("Ignoring unknown path {}", item.path);
                    None
                }
            })
            .filter(|page| seen.insert(page.path.clone()))
            .take(self.top_k)
            .cloned()
            .collect()
    }
}
