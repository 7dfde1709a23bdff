use crate::config::SearchConfig;
use crate::corpus::Corpus;
use crate::corpus::CorpusCache;
use crate::corpus::CorpusSource;
use crate::corpus::HttpCorpusSource;
use crate::error::Result;
use crate::error::SearchError;
use crate::llm_ranker::ModelRanker;
use crate::normalizer::QueryNormalizer;
use crate::page::DocPage;
use crate::scorer::TermOverlapScorer;
use aem_lm_client::LanguageModel;
use log::debug;
use log::info;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Entry point for documentation lookups.
///
/// Owns the corpus cache, so every search through one matcher shares a
/// single index fetch.
#[derive(Debug)]
pub struct DocsMatcher {
    config: SearchConfig,
    normalizer: QueryNormalizer,
    scorer: TermOverlapScorer,
    cache: CorpusCache,
}

impl DocsMatcher {
    /// Matcher backed by the configured HTTP index.
    pub fn new(config: SearchConfig) -> Result<Self> {
        let source = HttpCorpusSource::new(&config.index_url, &config.site_base_url);
        Self::with_source(config, Arc::new(source))
    }

    pub fn with_source(config: SearchConfig, source: Arc<dyn CorpusSource>) -> Result<Self> {
        config.validate().map_err(SearchError::InvalidConfig)?;
        Ok(Self {
            scorer: TermOverlapScorer::new(config.default_limit),
            normalizer: QueryNormalizer::new(),
            cache: CorpusCache::new(source),
            config,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub async fn corpus(&self) -> Option<Arc<Corpus>> {
        self.cache.get_or_load().await
    }

    /// Up to `limit` pages containing every query term, earliest match
    /// first. `None` when nothing qualifies or no corpus is available.
    pub async fn find_relevant_docs(&self, query: &str, limit: usize) -> Option<Vec<DocPage>> {
        let terms = self.normalizer.normalize(query);
        if terms.is_empty() {
            debug!("Query '{query}' has no searchable terms");
            return None;
        }

        let corpus = self.corpus().await?;
        let hits = self.scorer.rank(&terms, corpus.pages(), Some(limit))?;
        info!("Found {} relevant pages for '{query}'", hits.len());
        Some(hits.into_iter().map(|hit| hit.page.clone()).collect())
    }

    /// Model-ranked pages. `Ok(None)` when no corpus is available; the list
    /// may be empty when the model output was unusable.
    pub async fn find_relevant_docs_with_model(
        &self,
        query: &str,
        model: Arc<dyn LanguageModel>,
        cancel: CancellationToken,
    ) -> Result<Option<Vec<DocPage>>> {
        let Some(corpus) = self.corpus().await else {
            return Ok(None);
        };
        let ranker = ModelRanker::new(model, &self.config);
        let pages = ranker.rank(query, &corpus, cancel).await?;
        Ok(Some(pages))
    }
}
