use super::CommandHandler;
use super::CommandInvocation;
use super::create_files_button;
use crate::error::Result;
use crate::prompts::NETWORK_ERROR_MESSAGE;
use crate::prompts::block_list_markdown;
use aem_block_collection::BlockNode;
use aem_block_collection::collect_files;
use aem_block_collection::render_file_tree;
use async_trait::async_trait;
use std::fmt::Write as _;
use tracing::warn;

const PROGRESS: &str = "Fetching Blocks From Block Collection ...🤔";
const LIST_HEADING: &str = "List of available blocks:";
const NOT_FOUND_HEADING: &str = "Block not found in collection \n here is the list of available blocks:";

/// Shows the source of a block from the public block collection.
pub(crate) struct CollectionHandler;

#[async_trait]
impl CommandHandler for CollectionHandler {
    async fn handle(&self, invocation: CommandInvocation<'_>) -> Result<()> {
        let CommandInvocation {
            services,
            request,
            sink,
            ..
        } = invocation;
        sink.progress(PROGRESS);

        let blocks = services.blocks.list_blocks().await;
        if blocks.is_empty() {
            sink.markdown(NETWORK_ERROR_MESSAGE);
            return Ok(());
        }

        let name = request.prompt.trim().to_lowercase();
        if name.is_empty() || name == "ls" {
            sink.markdown(&block_list_markdown(LIST_HEADING, &blocks));
            return Ok(());
        }
        if !blocks.contains(&name) {
            sink.markdown(&block_list_markdown(NOT_FOUND_HEADING, &blocks));
            return Ok(());
        }

        let block = match services.blocks.block_content(&name).await {
            Ok(block) => block,
            Err(err) => {
                warn!("failed to fetch block {name}: {err}");
                sink.markdown(&format!("Error fetching block: {err}"));
                return Ok(());
            }
        };

        sink.markdown(&render_block_source(&block));
        sink.button(create_files_button(&collect_files(&block))?);
        Ok(())
    }
}

/// Tree view of the block followed by every file in a fenced code block.
pub(crate) fn render_block_source(block: &BlockNode) -> String {
    let mut out = format!(
        "The folder/file structure is as follows:\n```markdown\n{}```\n",
        render_file_tree(block)
    );
    for file in collect_files(block) {
        let _ = write!(
            out,
            "\n{}:\n```{}\n{}\n```\n",
            file.path,
            file.language,
            file.content.trim_matches('\n')
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatRequest;
    use crate::chat::RecordingSink;
    use crate::handlers::test_support::BLOCKS_ROOT;
    use crate::handlers::test_support::mount_collection;
    use crate::handlers::test_support::services;
    use crate::prompts::CREATE_FILES_COMMAND;
    use aem_protocol::ChatCommand;
    use pretty_assertions::assert_eq;
    use tokio_util::sync::CancellationToken;
    use wiremock::MockServer;

    async fn run(server: &MockServer, prompt: &str) -> RecordingSink {
        let services = services(None, &format!("{}{BLOCKS_ROOT}/", server.uri()), None);
        let request = ChatRequest::new(Some(ChatCommand::Collection), prompt);
        let mut sink = RecordingSink::new();
        CollectionHandler
            .handle(CommandInvocation {
                services: &services,
                request: &request,
                sink: &mut sink,
                cancel: CancellationToken::new(),
            })
            .await
            .unwrap();
        sink
    }

    #[tokio::test]
    async fn ls_lists_blocks() {
        let server = MockServer::start().await;
        mount_collection(&server).await;
        let sink = run(&server, "ls").await;
        assert_eq!(sink.progress_messages(), vec![PROGRESS]);
        assert_eq!(
            sink.markdown_text(),
            "List of available blocks:\n\n- cards\n- hero\n"
        );
    }

    #[tokio::test]
    async fn unknown_block_lists_alternatives() {
        let server = MockServer::start().await;
        mount_collection(&server).await;
        let sink = run(&server, "carousel").await;
        assert!(sink.markdown_text().starts_with(NOT_FOUND_HEADING));
        assert!(sink.buttons().is_empty());
    }

    #[tokio::test]
    async fn known_block_shows_sources_and_button() {
        let server = MockServer::start().await;
        mount_collection(&server).await;
        let sink = run(&server, "Hero").await;

        assert_eq!(
            sink.markdown_text(),
            "The folder/file structure is as follows:\n```markdown\nhero\n    ├── hero.js\n    ├── hero.css\n```\n\
             \nblocks/hero/hero.js:\n```javascript\nexport default function decorate(block) {}\n```\n\
             \nblocks/hero/hero.css:\n```css\n.hero { height: 400px; }\n```\n"
        );
        let buttons = sink.buttons();
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].command, CREATE_FILES_COMMAND);
        assert_eq!(buttons[0].arguments[0][0]["path"], "blocks/hero/hero.js");
        assert_eq!(buttons[0].arguments[0][1]["type"], "css");
    }

    #[tokio::test]
    async fn unreachable_collection_reports_network_issue() {
        let server = MockServer::start().await;
        let sink = run(&server, "hero").await;
        assert_eq!(sink.markdown_text(), NETWORK_ERROR_MESSAGE);
    }
}
