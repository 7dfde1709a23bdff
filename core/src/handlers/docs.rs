use super::CommandHandler;
use super::CommandInvocation;
use super::stream_markdown;
use crate::error::Result;
use crate::prompts::DOCS_SYSTEM_MESSAGE;
use crate::prompts::NOT_FOUND_MESSAGE;
use aem_docs_search::DocPage;
use aem_docs_search::DocReference;
use aem_docs_search::RankingStrategy;
use aem_protocol::PromptProps;
use aem_protocol::assemble_prompt;
use async_trait::async_trait;
use tracing::info;

/// Answers questions from the aem.live documentation.
pub(crate) struct DocsHandler;

#[async_trait]
impl CommandHandler for DocsHandler {
    async fn handle(&self, invocation: CommandInvocation<'_>) -> Result<()> {
        let CommandInvocation {
            services,
            request,
            sink,
            cancel,
        } = invocation;
        let model = services.model()?;
        let config = services.docs.config();

        let pages = match config.ranking_strategy {
            RankingStrategy::TermOverlap => {
                services
                    .docs
                    .find_relevant_docs(&request.prompt, config.answer_limit)
                    .await
            }
            RankingStrategy::Model => {
                services
                    .docs
                    .find_relevant_docs_with_model(&request.prompt, model.clone(), cancel.clone())
                    .await?
            }
        };

        let Some(pages) = pages.filter(|pages| !pages.is_empty()) else {
            sink.markdown(NOT_FOUND_MESSAGE);
            return Ok(());
        };
        info!("answering from {} documentation pages", pages.len());

        let props = PromptProps::new(format!("{}?", request.prompt))
            .with_assistant_context(documents_json(&pages)?);
        let messages = assemble_prompt(DOCS_SYSTEM_MESSAGE, &props);
        stream_markdown(model.as_ref(), messages, sink, cancel).await?;
        Ok(())
    }
}

fn documents_json(pages: &[DocPage]) -> Result<String> {
    let references: Vec<DocReference<'_>> = pages.iter().map(DocPage::reference).collect();
    Ok(serde_json::to_string(&references)?)
}
