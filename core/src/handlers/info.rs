use super::CommandHandler;
use super::CommandInvocation;
use super::stream_markdown;
use crate::error::Result;
use crate::prompts::INFO_SYSTEM_MESSAGE;
use aem_protocol::PromptProps;
use aem_protocol::assemble_prompt;
use async_trait::async_trait;

const PROGRESS: &str = "Provide AEM block Info...";

/// Explains a block and sketches its source files.
pub(crate) struct InfoHandler;

#[async_trait]
impl CommandHandler for InfoHandler {
    async fn handle(&self, invocation: CommandInvocation<'_>) -> Result<()> {
        let model = invocation.services.model()?;
        invocation.sink.progress(PROGRESS);
        let messages = assemble_prompt(
            INFO_SYSTEM_MESSAGE,
            &PromptProps::new(invocation.request.prompt.as_str()),
        );
        stream_markdown(model.as_ref(), messages, invocation.sink, invocation.cancel).await?;
        Ok(())
    }
}
