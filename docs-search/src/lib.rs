/*!
# Documentation Relevance Matcher

Finds the documentation pages that should ground a language-model answer.

## Features

- **Query normalization**: lowercase alphanumeric tokens, short tokens and
  stopwords dropped
- **Lazy corpus cache**: the documentation index is fetched once per cache
  and reused afterwards
- **Term-overlap ranking**: every query term must appear; earliest match wins
- **Model-delegated ranking**: the model picks paths, the corpus resolves them
- **Fenced JSON extraction**: tolerant parsing of model output

## Architecture

```text
Query
  └─> QueryNormalizer (tokens)
        └─> CorpusCache::get_or_load (DocPage corpus)
              ├─> TermOverlapScorer (all terms present, earliest match first)
              └─> ModelRanker (prompt → streamed JSON → paths → pages)
```

## Example

```rust,no_run
use aem_docs_search::{DocsMatcher, SearchConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matcher = DocsMatcher::new(SearchConfig::default())?;

    match matcher.find_relevant_docs("go live checklist", 2).await {
        Some(pages) => {
            for page in pages {
                println!("{} ({})", page.title, page.url);
            }
        }
        None => println!("nothing found"),
    }
    Ok(())
}
```
*/

mod config;
mod corpus;
mod error;
mod json;
mod llm_ranker;
mod matcher;
mod normalizer;
mod page;
mod scorer;

pub use config::RankingStrategy;
pub use config::SearchConfig;
pub use corpus::Corpus;
pub use corpus::CorpusCache;
pub use corpus::CorpusSource;
pub use corpus::HttpCorpusSource;
pub use corpus::parse_index;
pub use error::Result;
pub use error::SearchError;
pub use json::parse_json;
pub use json::parse_json_array;
pub use json::strip_code_fence;
pub use llm_ranker::ModelRanker;
pub use llm_ranker::RankedPath;
pub use matcher::DocsMatcher;
pub use normalizer::QueryNormalizer;
pub use normalizer::STOPWORDS;
pub use page::DocPage;
pub use page::DocReference;
pub use page::IndexEntry;
pub use page::ScoredHit;
pub use scorer::TermOverlapScorer;
