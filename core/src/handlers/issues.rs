use super::CommandHandler;
use super::CommandInvocation;
use super::stream_markdown;
use crate::chat::ChatButton;
use crate::chat::ResponseSink;
use crate::error::Result;
use crate::prompts::FETCH_ISSUE_COMMAND;
use crate::prompts::ISSUES_HELP_MESSAGE;
use crate::prompts::ISSUES_SYSTEM_MESSAGE;
use crate::prompts::ISSUE_NUMBER_NOT_FOUND_MESSAGE;
use crate::prompts::NETWORK_ERROR_MESSAGE;
use crate::prompts::REPOSITORY_NOT_FOUND_MESSAGE;
use aem_github_issues::GitHubError;
use aem_github_issues::Issue;
use aem_github_issues::IssueDetails;
use aem_github_issues::IssueQuery;
use aem_lm_client::LanguageModel;
use aem_protocol::PromptProps;
use aem_protocol::assemble_prompt;
use async_trait::async_trait;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Looks up GitHub issues of the project and explains them.
pub(crate) struct IssuesHandler;

#[async_trait]
impl CommandHandler for IssuesHandler {
    async fn handle(&self, invocation: CommandInvocation<'_>) -> Result<()> {
        let CommandInvocation {
            services,
            request,
            sink,
            cancel,
        } = invocation;
        let Some(github) = services.github.as_ref() else {
            sink.markdown(REPOSITORY_NOT_FOUND_MESSAGE);
            return Ok(());
        };

        let details = match IssueQuery::parse(&request.prompt) {
            IssueQuery::Latest => {
                let model = services.model()?;
                match github.latest_issue().await {
                    Ok(Some(details)) => Some((model, details)),
                    Ok(None) => {
                        sink.markdown("Latest issue details not found.");
                        None
                    }
                    Err(err) => {
                        report_network_error(sink, &err);
                        None
                    }
                }
            }
            IssueQuery::Number(number) => {
                let model = services.model()?;
                match github.issue_details(number).await {
                    Ok(details) => Some((model, details)),
                    Err(GitHubError::Status { status: 404, .. }) => {
                        sink.markdown(&format!("Details for issue #{number} not found."));
                        None
                    }
                    Err(err) => {
                        report_network_error(sink, &err);
                        None
                    }
                }
            }
            IssueQuery::InvalidNumber => {
                sink.markdown(ISSUE_NUMBER_NOT_FOUND_MESSAGE);
                None
            }
            IssueQuery::List => {
                match github.list_issues(services.issue_list_limit).await {
                    Ok(issues) => offer_issues(sink, &issues),
                    Err(err) => report_network_error(sink, &err),
                }
                None
            }
            IssueQuery::Unknown => {
                sink.markdown(ISSUES_HELP_MESSAGE);
                None
            }
        };

        if let Some((model, details)) = details {
            explain_issue(model.as_ref(), &details, &request.prompt, sink, cancel).await?;
        }
        Ok(())
    }
}

fn report_network_error(sink: &mut dyn ResponseSink, err: &GitHubError) {
    warn!("GitHub request failed: {err}");
    sink.markdown(NETWORK_ERROR_MESSAGE);
}

/// One button per issue; pressing it asks for that issue's details.
fn offer_issues(sink: &mut dyn ResponseSink, issues: &[Issue]) {
    if issues.is_empty() {
        sink.markdown("No issues found.");
        return;
    }
    sink.markdown("Here are the latest issues:\n");
    for issue in issues {
        sink.button(ChatButton {
            command: FETCH_ISSUE_COMMAND.to_string(),
            title: format!("{}:    {}", issue.number, issue.title),
            tooltip: Some(format!("Fetch details for Issue #{}", issue.number)),
            arguments: vec![json!(format!(
                "/issues fetch me details of issue #{}",
                issue.number
            ))],
        });
    }
}

async fn explain_issue(
    model: &dyn LanguageModel,
    details: &IssueDetails,
    prompt: &str,
    sink: &mut dyn ResponseSink,
    cancel: CancellationToken,
) -> Result<()> {
    sink.progress(&format!("Issue \"{}\" loaded.", details.issue.title));
    sink.markdown(&details.to_markdown());
    sink.progress("Copilot suggestion....");

    let props = PromptProps::new(prompt).with_assistant_context(details.to_prompt_context());
    let messages = assemble_prompt(ISSUES_SYSTEM_MESSAGE, &props);
    stream_markdown(model, messages, sink, cancel).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatRequest;
    use crate::chat::RecordingSink;
    use crate::handlers::test_support::services;
    use aem_github_issues::GitHubClient;
    use aem_github_issues::RepoRef;
    use aem_lm_client::FakeModel;
    use aem_protocol::ChatCommand;
    use aem_protocol::Role;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;
    use wiremock::matchers::method;
    use wiremock::matchers::path;

    fn issue(number: u64, title: &str) -> serde_json::Value {
        json!({
            "number": number,
            "title": title,
            "body": "Hero image overflows on mobile",
            "html_url": format!("https://github.com/adobe/site/issues/{number}"),
            "state": "open"
        })
    }

    async fn run(
        server: Option<&MockServer>,
        model: Arc<FakeModel>,
        prompt: &str,
    ) -> RecordingSink {
        let github = server.map(|server| {
            GitHubClient::with_base_url(RepoRef::new("github.com", "adobe", "site"), server.uri(), None)
        });
        let services = services(Some(model), "http://127.0.0.1:9/", github);
        let request = ChatRequest::new(Some(ChatCommand::Issues), prompt);
        let mut sink = RecordingSink::new();
        IssuesHandler
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
    async fn without_repository() {
        let sink = run(None, Arc::new(FakeModel::new()), "latest issue").await;
        assert_eq!(sink.markdown_text(), REPOSITORY_NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn explains_issue_by_number() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/adobe/site/issues/12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue(12, "Hero overflow")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/adobe/site/issues/12/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let model = Arc::new(FakeModel::new().reply(["Clamp the image width."]));
        let sink = run(Some(&server), model.clone(), "explain issue #12").await;

        assert_eq!(
            sink.progress_messages(),
            vec!["Issue \"Hero overflow\" loaded.", "Copilot suggestion...."]
        );
        let text = sink.markdown_text();
        assert!(text.starts_with("Issue: **Hero overflow**"));
        assert!(text.ends_with("----\n\nClamp the image width."));

        let messages = &model.requests()[0];
        assert_eq!(messages[1].role, Role::Assistant);
        assert!(messages[1].text().contains("Hero image overflows on mobile"));
        assert_eq!(messages[2].text(), "explain issue #12");
    }

    #[tokio::test]
    async fn missing_issue_number() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})),
            )
            .mount(&server)
            .await;

        let model = Arc::new(FakeModel::new());
        let sink = run(Some(&server), model.clone(), "issue #99").await;
        assert_eq!(sink.markdown_text(), "Details for issue #99 not found.");
        assert_eq!(model.request_count(), 0);
    }

    #[tokio::test]
    async fn issue_zero_is_rejected_without_fetching() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue(1, "Hero overflow")))
            .expect(0)
            .mount(&server)
            .await;

        let model = Arc::new(FakeModel::new());
        let sink = run(Some(&server), model.clone(), "show issue #0").await;
        assert_eq!(sink.markdown_text(), ISSUE_NUMBER_NOT_FOUND_MESSAGE);
        assert_eq!(model.request_count(), 0);
    }

    #[tokio::test]
    async fn lists_issues_as_buttons() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/adobe/site/issues"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([issue(3, "Footer links"), issue(2, "Hero overflow")])),
            )
            .mount(&server)
            .await;

        let sink = run(Some(&server), Arc::new(FakeModel::new()), "list all issues").await;
        assert_eq!(sink.markdown_text(), "Here are the latest issues:\n");
        let buttons = sink.buttons();
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0].title, "3:    Footer links");
        assert_eq!(buttons[0].tooltip.as_deref(), Some("Fetch details for Issue #3"));
        assert_eq!(
            buttons[1].arguments,
            vec![json!("/issues fetch me details of issue #2")]
        );
    }

    #[tokio::test]
    async fn latest_issue_when_none_open() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/adobe/site/issues"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let sink = run(Some(&server), Arc::new(FakeModel::new()), "show the latest issue").await;
        assert_eq!(sink.markdown_text(), "Latest issue details not found.");
    }

    #[tokio::test]
    async fn unknown_intent_gets_help() {
        let server = MockServer::start().await;
        let sink = run(Some(&server), Arc::new(FakeModel::new()), "what's up").await;
        assert_eq!(sink.markdown_text(), ISSUES_HELP_MESSAGE);
    }

    #[tokio::test]
    async fn server_failure_is_a_network_issue() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let sink = run(Some(&server), Arc::new(FakeModel::new()), "list issues").await;
        assert_eq!(sink.markdown_text(), NETWORK_ERROR_MESSAGE);
    }
}
