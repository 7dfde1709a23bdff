use crate::chat::ChatRequest;
use crate::chat::ChatResult;
use crate::chat::Followup;
use crate::chat::ResponseSink;
use crate::config::AemConfig;
use crate::error::CoreError;
use crate::error::Result;
use crate::handlers::CommandInvocation;
use crate::handlers::Services;
use crate::handlers::handler_for;
use crate::prompts::GENERIC_ERROR_MESSAGE;
use crate::prompts::GREETINGS;
use crate::prompts::MODEL_UNAVAILABLE_MESSAGE;
use crate::prompts::OFF_TOPIC_MESSAGE;
use aem_block_collection::BlockCollectionClient;
use aem_docs_search::DocsMatcher;
use aem_github_issues::GitHubClient;
use aem_github_issues::GitHubConfig;
use aem_github_issues::RepoRef;
use aem_github_issues::discover_repo;
use aem_lm_client::ModelRegistry;
use aem_protocol::ChatCommand;
use rand::seq::IndexedRandom;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing::info;
use tracing::warn;

/// One of the "thinking" lines shown while a request starts.
pub fn random_greeting() -> &'static str {
    GREETINGS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or_default()
}

/// Routes chat requests to the command handlers.
#[derive(Debug)]
pub struct ChatParticipant {
    config: AemConfig,
    services: Services,
}

impl ChatParticipant {
    /// Builds every backend from `config`. The GitHub repository comes from
    /// the configuration, else from the `origin` remote of `workspace_root`.
    pub fn new(
        config: AemConfig,
        models: ModelRegistry,
        workspace_root: Option<&Path>,
    ) -> Result<Self> {
        config.validate().map_err(CoreError::Config)?;
        let docs = DocsMatcher::new(config.docs.clone())?;
        let github = github_client(&config.github, workspace_root)?;
        if github.is_none() {
            info!("no GitHub repository configured; issue commands are disabled");
        }
        Ok(Self {
            services: Services {
                models,
                selector: config.model_selector.clone(),
                docs,
                blocks: BlockCollectionClient::new(config.blocks.clone()),
                github,
                issue_list_limit: config.github.list_limit,
            },
            config,
        })
    }

    /// Replaces the documentation matcher, e.g. with one over a fixed corpus.
    pub fn with_docs_matcher(mut self, docs: DocsMatcher) -> Self {
        self.services.docs = docs;
        self
    }

    pub fn config(&self) -> &AemConfig {
        &self.config
    }

    pub fn docs(&self) -> &DocsMatcher {
        &self.services.docs
    }

    pub fn blocks(&self) -> &BlockCollectionClient {
        &self.services.blocks
    }

    /// Answers one request. Failures are rendered into `sink` and noted in
    /// the result; nothing is propagated.
    pub async fn handle(
        &self,
        request: &ChatRequest,
        sink: &mut dyn ResponseSink,
        cancel: CancellationToken,
    ) -> ChatResult {
        sink.progress(random_greeting());
        let handler = handler_for(request.command);
        let outcome = handler
            .handle(CommandInvocation {
                services: &self.services,
                request,
                sink: &mut *sink,
                cancel,
            })
            .await;

        match outcome {
            Ok(()) => ChatResult {
                command: request.command,
                error: None,
            },
            Err(err) => {
                render_error(&err, sink);
                ChatResult {
                    command: request.command,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// Prompts suggested after a response.
    pub fn followups(&self, _result: &ChatResult) -> Vec<Followup> {
        vec![Followup {
            prompt: "How to build AEM blocks?".to_string(),
            label: "Build with AEM".to_string(),
            command: Some(ChatCommand::Docs),
        }]
    }
}

fn render_error(err: &CoreError, sink: &mut dyn ResponseSink) {
    match err {
        CoreError::ModelUnavailable => {
            warn!("request dropped: {err}");
            sink.markdown(MODEL_UNAVAILABLE_MESSAGE);
        }
        err if err.is_off_topic() => {
            info!("model refused an off-topic request");
            sink.markdown(OFF_TOPIC_MESSAGE);
        }
        err => {
            error!("chat request failed: {err}");
            sink.markdown(GENERIC_ERROR_MESSAGE);
        }
    }
}

fn github_client(
    config: &GitHubConfig,
    workspace_root: Option<&Path>,
) -> Result<Option<GitHubClient>> {
    let repo = match (&config.repository, workspace_root) {
        (Some(slug), _) => RepoRef::from_slug(slug)?,
        (None, Some(root)) => match discover_repo(root) {
            Some(repo) => repo,
            None => return Ok(None),
        },
        (None, None) => return Ok(None),
    };
    let api_base_url = config
        .api_base_url
        .clone()
        .unwrap_or_else(|| repo.api_base_url());
    info!("using GitHub repository {}", repo.slug());
    Ok(Some(GitHubClient::with_base_url(
        repo,
        api_base_url,
        config.token(),
    )))
}
