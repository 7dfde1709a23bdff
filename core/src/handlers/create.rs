use super::CommandHandler;
use super::CommandInvocation;
use super::create_files_button;
use crate::chat::ResponseSink;
use crate::error::Result;
use crate::project::ProjectContext;
use crate::prompts::CREATE_SAMPLE_ASSISTANT_OUTPUT;
use crate::prompts::CREATE_SAMPLE_USER_MESSAGE;
use crate::prompts::CREATE_SYSTEM_MESSAGE;
use crate::prompts::NO_RESPONSE_MESSAGE;
use aem_block_collection::BlockTemplate;
use aem_block_collection::render_block_markdown;
use aem_docs_search::parse_json;
use aem_lm_client::LanguageModel;
use aem_lm_client::collect_text;
use aem_protocol::PromptProps;
use aem_protocol::assemble_prompt;
use async_trait::async_trait;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::warn;

const PROGRESS: &str = "Creating AEM block...";

/// Generates a new block from a description.
pub(crate) struct CreateHandler;

#[async_trait]
impl CommandHandler for CreateHandler {
    async fn handle(&self, invocation: CommandInvocation<'_>) -> Result<()> {
        let CommandInvocation {
            services,
            request,
            sink,
            cancel,
        } = invocation;
        let model = services.model()?;
        sink.progress(PROGRESS);

        let project = project_context(request.workspace_root.as_deref()).await;
        generate_block(
            model.as_ref(),
            BlockRequest {
                query: &request.prompt,
                project_context: project.as_deref(),
                reference_code: None,
            },
            sink,
            cancel,
        )
        .await
    }
}

/// Inputs of one block generation.
pub(crate) struct BlockRequest<'a> {
    pub query: &'a str,
    pub project_context: Option<&'a str>,
    /// Source of an existing block to start from
    pub reference_code: Option<&'a str>,
}

pub(crate) async fn project_context(root: Option<&Path>) -> Option<String> {
    ProjectContext::load(root?).await.to_prompt_context()
}

/// Asks the model for a block template and renders it with a "Create
/// Block" button. Output that is not a template is shown as-is.
pub(crate) async fn generate_block(
    model: &dyn LanguageModel,
    block: BlockRequest<'_>,
    sink: &mut dyn ResponseSink,
    cancel: CancellationToken,
) -> Result<()> {
    let mut props = PromptProps::new(block.query)
        .with_user_context(CREATE_SAMPLE_USER_MESSAGE)
        .with_assistant_context(CREATE_SAMPLE_ASSISTANT_OUTPUT);
    if let Some(context) = block.project_context {
        props = props.with_user_context(context);
    }
    if let Some(code) = block.reference_code {
        props = props.with_user_context(format!("Relevant Block Code: {code}"));
    }

    let messages = assemble_prompt(CREATE_SYSTEM_MESSAGE, &props);
    let text = collect_text(model.send_request(messages, cancel).await?).await?;
    if text.trim().is_empty() {
        sink.markdown(NO_RESPONSE_MESSAGE);
        return Ok(());
    }

    match parse_json::<BlockTemplate>(&text) {
        Ok(template) => {
            sink.markdown(&render_block_markdown(&template));
            sink.button(create_files_button(&template.files)?);
        }
        Err(err) => {
            warn!("model output is not a block template: {err}");
            sink.markdown(&text);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatRequest;
    use crate::chat::RecordingSink;
    use crate::handlers::test_support::services;
    use crate::prompts::CREATE_FILES_COMMAND;
    use aem_lm_client::FakeModel;
    use aem_protocol::ChatCommand;
    use aem_protocol::Role;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;

    const TEMPLATE: &str = r#"```json
{"tree":{"name":"quote","type":"directory","children":[{"name":"quote.js","type":"file"}]},
 "files":[{"type":"javascript","path":"blocks/quote/quote.js","content":"export default function decorate(block) {}"}]}
```"#;

    async fn run(model: Arc<FakeModel>, request: ChatRequest) -> RecordingSink {
        let services = services(Some(model), "http://127.0.0.1:9/", None);
        let mut sink = RecordingSink::new();
        CreateHandler
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
    async fn renders_generated_block() {
        let model = Arc::new(FakeModel::new().reply([&TEMPLATE[..40], &TEMPLATE[40..]]));
        let request = ChatRequest::new(Some(ChatCommand::Create), "a quote block");
        let sink = run(model.clone(), request).await;

        assert_eq!(sink.progress_messages(), vec![PROGRESS]);
        assert!(sink.markdown_text().contains("## blocks/quote/quote.js\n```javascript\n"));
        let buttons = sink.buttons();
        assert_eq!(buttons[0].command, CREATE_FILES_COMMAND);
        assert_eq!(buttons[0].arguments[0][0]["path"], "blocks/quote/quote.js");

        let messages = &model.requests()[0];
        let roles: Vec<Role> = messages.iter().map(|message| message.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(messages[3].text(), "a quote block");
    }

    #[tokio::test]
    async fn includes_project_styles() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("styles")).unwrap();
        std::fs::write(dir.path().join("styles/styles.css"), "body { margin: 0; }").unwrap();

        let model = Arc::new(FakeModel::new().reply([TEMPLATE]));
        let request = ChatRequest::new(Some(ChatCommand::Create), "a quote block")
            .with_workspace_root(dir.path());
        run(model.clone(), request).await;

        let messages = &model.requests()[0];
        assert_eq!(messages.len(), 5);
        assert!(messages[3].text().contains("body { margin: 0; }"));
    }

    #[tokio::test]
    async fn unparsable_output_is_shown_raw() {
        let model = Arc::new(FakeModel::new().reply(["I can't help with that"]));
        let request = ChatRequest::new(Some(ChatCommand::Create), "a quote block");
        let sink = run(model, request).await;
        assert_eq!(sink.markdown_text(), "I can't help with that");
        assert!(sink.buttons().is_empty());
    }

    #[tokio::test]
    async fn empty_output_reports_no_response() {
        let model = Arc::new(FakeModel::new());
        let request = ChatRequest::new(Some(ChatCommand::Create), "a quote block");
        let sink = run(model, request).await;
        assert_eq!(sink.markdown_text(), NO_RESPONSE_MESSAGE);
    }
}
