use crate::chat::ChatButton;
use crate::chat::ChatRequest;
use crate::chat::ResponseSink;
use crate::error::CoreError;
use crate::error::Result;
use crate::prompts::CREATE_FILES_COMMAND;
use crate::prompts::CREATE_FILES_TITLE;
use aem_block_collection::BlockCollectionClient;
use aem_docs_search::DocsMatcher;
use aem_github_issues::GitHubClient;
use aem_lm_client::LanguageModel;
use aem_lm_client::ModelRegistry;
use aem_lm_client::ModelSelector;
use aem_protocol::ChatCommand;
use aem_protocol::ChatMessage;
use async_trait::async_trait;
use futures::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

mod collection;
mod create;
mod docs;
mod info;
mod issues;
mod vision;

pub(crate) use collection::CollectionHandler;
pub(crate) use create::CreateHandler;
pub(crate) use docs::DocsHandler;
pub(crate) use info::InfoHandler;
pub(crate) use issues::IssuesHandler;
pub(crate) use vision::VisionHandler;

/// Backends shared by every handler.
#[derive(Debug)]
pub(crate) struct Services {
    pub models: ModelRegistry,
    pub selector: ModelSelector,
    pub docs: DocsMatcher,
    pub blocks: BlockCollectionClient,
    pub github: Option<GitHubClient>,
    /// Issues offered by the list intent
    pub issue_list_limit: usize,
}

impl Services {
    pub(crate) fn model(&self) -> Result<Arc<dyn LanguageModel>> {
        self.models
            .select(&self.selector)
            .ok_or(CoreError::ModelUnavailable)
    }
}

pub(crate) struct CommandInvocation<'a> {
    pub services: &'a Services,
    pub request: &'a ChatRequest,
    pub sink: &'a mut dyn ResponseSink,
    pub cancel: CancellationToken,
}

#[async_trait]
pub(crate) trait CommandHandler: Send + Sync {
    async fn handle(&self, invocation: CommandInvocation<'_>) -> Result<()>;
}

/// Handler for `command`; plain questions go to the docs handler.
pub(crate) fn handler_for(command: Option<ChatCommand>) -> &'static dyn CommandHandler {
    match command {
        Some(ChatCommand::Create) => &CreateHandler,
        Some(ChatCommand::Collection) => &CollectionHandler,
        Some(ChatCommand::Issues) => &IssuesHandler,
        Some(ChatCommand::Vision) => &VisionHandler,
        Some(ChatCommand::Info) => &InfoHandler,
        Some(ChatCommand::Docs) | None => &DocsHandler,
    }
}

/// Streams the model's answer into the sink as it arrives and returns the
/// full text.
pub(crate) async fn stream_markdown(
    model: &dyn LanguageModel,
    messages: Vec<ChatMessage>,
    sink: &mut dyn ResponseSink,
    cancel: CancellationToken,
) -> Result<String> {
    let mut stream = model.send_request(messages, cancel).await?;
    let mut text = String::new();
    while let Some(fragment) = stream.next().await {
        let fragment = fragment?;
        sink.markdown(&fragment);
        text.push_str(&fragment);
    }
    debug!("streamed {} characters from {}", text.len(), model.info().id);
    Ok(text)
}

/// Button that hands generated or fetched files to the editor.
pub(crate) fn create_files_button<T: Serialize>(files: &[T]) -> Result<ChatButton> {
    Ok(ChatButton {
        command: CREATE_FILES_COMMAND.to_string(),
        title: CREATE_FILES_TITLE.to_string(),
        tooltip: None,
        arguments: vec![serde_json::to_value(files)?],
    })
}
