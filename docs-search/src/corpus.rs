use crate::error::Result;
use crate::error::SearchError;
use crate::page::DocPage;
use crate::page::IndexEntry;
use async_trait::async_trait;
use log::debug;
use log::info;
use log::warn;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// The loaded documentation corpus, in index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    pages: Vec<DocPage>,
    by_path: HashMap<String, usize>,
}

impl Corpus {
    pub fn new(pages: Vec<DocPage>) -> Self {
        let mut by_path = HashMap::with_capacity(pages.len());
        for (idx, page) in pages.iter().enumerate() {
            by_path.entry(page.path.clone()).or_insert(idx);
        }
        Self { pages, by_path }
    }

    pub fn pages(&self) -> &[DocPage] {
        &self.pages
    }

    pub fn find_by_path(&self, path: &str) -> Option<&DocPage> {
        self.by_path.get(path).map(|&idx| &self.pages[idx])
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[derive(Deserialize)]
struct IndexDocument {
    #[serde(default)]
    data: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// `null`, `false`, `0` and `""` do not count as an error.
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(flag) => *flag,
        serde_json::Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(text) => !text.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// Parse an index payload. Rows that are not valid entries are dropped.
pub fn parse_index(body: &str, site_base_url: &str) -> Result<Corpus> {
    let document: IndexDocument = serde_json::from_str(body)?;

    if let Some(error) = document.error.filter(is_truthy) {
        let message = match error {
            serde_json::Value::String(message) => message,
            other => other.to_string(),
        };
        return Err(SearchError::Index(message));
    }

    let rows = document
        .data
        .ok_or_else(|| SearchError::MalformedIndex("missing `data` array".to_string()))?;

    let total = rows.len();
    let pages: Vec<DocPage> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| match serde_json::from_value::<IndexEntry>(row) {
            Ok(entry) => Some(DocPage::from_entry(entry, site_base_url)),
            Err(err) => {
                warn!("Skipping index row {idx}: {err}");
                None
            }
        })
        .collect();

    debug!("Parsed {} of {total} index rows", pages.len());
    Ok(Corpus::new(pages))
}

/// Where the corpus comes from.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    async fn fetch(&self) -> Result<Corpus>;
}

/// Fetches the index over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCorpusSource {
    client: reqwest::Client,
    index_url: String,
    site_base_url: String,
}

impl HttpCorpusSource {
    pub fn new(index_url: impl Into<String>, site_base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            index_url: index_url.into(),
            site_base_url: site_base_url.into(),
        }
    }
}

#[async_trait]
impl CorpusSource for HttpCorpusSource {
    async fn fetch(&self) -> Result<Corpus> {
        debug!("Fetching documentation index from {}", self.index_url);
        let body = self
            .client
            .get(&self.index_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_index(&body, &self.site_base_url)
    }
}

/// Lazily loaded corpus shared by every search.
///
/// The first successful load is kept for the lifetime of the cache. Failed
/// loads are not remembered, so a later call fetches again.
pub struct CorpusCache {
    source: Arc<dyn CorpusSource>,
    cell: OnceCell<Arc<Corpus>>,
}

impl CorpusCache {
    pub fn new(source: Arc<dyn CorpusSource>) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
        }
    }

    /// The cached corpus, loading it on first use. `None` when no corpus is
    /// available.
    pub async fn get_or_load(&self) -> Option<Arc<Corpus>> {
        let loaded = self
            .cell
            .get_or_try_init(|| async {
                let corpus = self.source.fetch().await?;
                info!("Loaded documentation corpus with {} pages", corpus.len());
                Ok::<_, SearchError>(Arc::new(corpus))
            })
            .await;

        match loaded {
            Ok(corpus) => Some(Arc::clone(corpus)),
            Err(err) => {
                warn!("Documentation corpus unavailable: {err}");
                None
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

impl std::fmt::Debug for CorpusCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusCache")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    const BASE: &str = "https://www.aem.live";

    struct CountingSource {
        calls: AtomicUsize,
        fail_first: usize,
    }

    impl CountingSource {
        fn new(fail_first: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first,
            }
        }
    }

    #[async_trait]
    impl CorpusSource for CountingSource {
        async fn fetch(&self) -> Result<Corpus> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                return Err(SearchError::Index("temporarily unavailable".to_string()));
            }
            parse_index(r#"{"data":[{"path":"/a","title":"A"}]}"#, BASE)
        }
    }

    #[test]
    fn test_parse_index_maps_rows() {
        let corpus = parse_index(
            r#"{"data":[
                {"path":"/docs/a","title":"A","content":"alpha","description":"first"},
                {"path":"/docs/b","title":"B"}
            ]}"#,
            BASE,
        )
        .unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.pages()[0].url, "https://www.aem.live/docs/a");
        assert_eq!(corpus.pages()[1].content, "");
        assert_eq!(corpus.find_by_path("/docs/b").unwrap().title, "B");
        assert!(corpus.find_by_path("/docs/c").is_none());
    }

    #[test]
    fn test_parse_index_drops_malformed_rows() {
        let corpus = parse_index(
            r#"{"data":[{"title":"no path"},{"path":"/ok","title":"Ok"},42]}"#,
            BASE,
        )
        .unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.pages()[0].path, "/ok");
    }

    #[test]
    fn test_parse_index_rejects_error_payloads() {
        assert!(matches!(
            parse_index(r#"{"error":"not found"}"#, BASE),
            Err(SearchError::Index(msg)) if msg == "not found"
        ));
        assert!(matches!(
            parse_index(r#"{"data":[],"error":{"code":500}}"#, BASE),
            Err(SearchError::Index(_))
        ));
        assert!(matches!(
            parse_index(r#"{"error":true,"data":[]}"#, BASE),
            Err(SearchError::Index(msg)) if msg == "true"
        ));
        assert!(matches!(
            parse_index(r#"{"total":0}"#, BASE),
            Err(SearchError::MalformedIndex(_))
        ));
        assert!(matches!(parse_index("<html>", BASE), Err(SearchError::Json(_))));
    }

    #[test]
    fn test_parse_index_ignores_falsy_error_values() {
        for error in [r#""""#, "false", "0", "null"] {
            let body = format!(r#"{{"error":{error},"data":[{{"path":"/a","title":"A"}}]}}"#);
            let corpus = parse_index(&body, BASE).unwrap();
            assert_eq!(corpus.pages().len(), 1, "error value {error}");
        }
    }

    #[tokio::test]
    async fn test_cache_fetches_once() {
        let source = Arc::new(CountingSource::new(0));
        let cache = CorpusCache::new(source.clone());
        assert!(!cache.is_loaded());

        let first = cache.get_or_load().await.unwrap();
        let second = cache.get_or_load().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.is_loaded());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let source = Arc::new(CountingSource::new(1));
        let cache = CorpusCache::new(source.clone());

        assert!(cache.get_or_load().await.is_none());
        assert!(!cache.is_loaded());

        let corpus = cache.get_or_load().await.unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
