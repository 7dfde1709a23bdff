use super::CommandHandler;
use super::CommandInvocation;
use super::create::BlockRequest;
use super::create::generate_block;
use super::create::project_context;
use crate::error::Result;
use crate::handlers::Services;
use crate::prompts::NO_IMAGE_MESSAGE;
use crate::prompts::NO_RESPONSE_MESSAGE;
use crate::prompts::vision_system_message;
use aem_block_collection::collect_files;
use aem_docs_search::parse_json;
use aem_lm_client::collect_text;
use aem_protocol::PromptProps;
use aem_protocol::assemble_prompt;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;
use tracing::warn;

const PROGRESS: &str = "Analyzing image...";

/// Block the model picked for a screenshot.
#[derive(Debug, Deserialize)]
struct BlockChoice {
    block: String,
    #[serde(default)]
    style: String,
}

/// Matches an image to a collection block and generates a styled variant.
pub(crate) struct VisionHandler;

#[async_trait]
impl CommandHandler for VisionHandler {
    async fn handle(&self, invocation: CommandInvocation<'_>) -> Result<()> {
        let CommandInvocation {
            services,
            request,
            sink,
            cancel,
        } = invocation;
        if request.references.is_empty() {
            sink.markdown(NO_IMAGE_MESSAGE);
            return Ok(());
        }
        let model = services.model()?;
        sink.progress(PROGRESS);

        let blocks = services.blocks.list_blocks().await;
        let mut props = PromptProps::new(format!("User Query: {}", request.prompt));
        for image in &request.references {
            props = props.with_image(image.mime_type.as_str(), image.data.clone());
        }
        let messages = assemble_prompt(&vision_system_message(&blocks), &props);
        let text = collect_text(model.send_request(messages, cancel.clone()).await?).await?;
        if text.trim().is_empty() {
            sink.markdown(NO_RESPONSE_MESSAGE);
            return Ok(());
        }

        let choice = match parse_json::<BlockChoice>(&text) {
            Ok(choice) => choice,
            Err(err) => {
                warn!("model output is not a block choice: {err}");
                sink.markdown(&text);
                return Ok(());
            }
        };
        info!("image matched block {}", choice.block);

        let description = format!(
            "{} block with the following style: {}",
            choice.block, choice.style
        );
        sink.markdown(&format!("creating {description}\n\n"));

        let query = format!("create {description}");
        let reference_code = reference_code(services, &choice.block).await;
        let project = project_context(request.workspace_root.as_deref()).await;
        generate_block(
            model.as_ref(),
            BlockRequest {
                query: &query,
                project_context: project.as_deref(),
                reference_code: reference_code.as_deref(),
            },
            sink,
            cancel,
        )
        .await
    }
}

/// Sources of the chosen collection block as JSON, when it can be fetched.
async fn reference_code(services: &Services, block: &str) -> Option<String> {
    if !services.blocks.has_block(block).await {
        return None;
    }
    match services.blocks.block_content(block).await {
        Ok(node) => serde_json::to_string(&collect_files(&node)).ok(),
        Err(err) => {
            warn!("continuing without sources of {block}: {err}");
            None
        }
    }
}
