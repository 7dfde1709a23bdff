use aem_core::AemConfig;
use aem_docs_search::DocPage;
use aem_docs_search::DocsMatcher;
use anyhow::Context;
use anyhow::Result;

/// Rank documentation pages by term overlap with a question.
#[derive(Debug, clap::Parser)]
pub struct SearchCli {
    /// The question; several words may be given without quoting.
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Maximum number of pages to print.
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Documentation index to search instead of the configured one.
    #[arg(long, value_name = "URL")]
    pub index_url: Option<String>,

    /// Print the pages as JSON.
    #[arg(long)]
    pub json: bool,
}

impl SearchCli {
    pub async fn run(self, mut config: AemConfig) -> Result<()> {
        if let Some(index_url) = self.index_url {
            config.docs.index_url = index_url;
        }
        let limit = self.limit.unwrap_or(config.docs.default_limit);
        let matcher = DocsMatcher::new(config.docs).context("invalid docs configuration")?;

        let query = self.query.join(" ");
        let pages = matcher
            .find_relevant_docs(&query, limit)
            .await
            .unwrap_or_default();

        if self.json {
            let references: Vec<_> = pages.iter().map(DocPage::reference).collect();
            println!("{}", serde_json::to_string_pretty(&references)?);
            return Ok(());
        }

        if pages.is_empty() {
            println!("No matching documentation pages.");
            return Ok(());
        }
        for (rank, page) in pages.iter().enumerate() {
            println!("{}. {}", rank + 1, page.title);
            println!("   {}", page.url);
        }
        Ok(())
    }
}
