use aem_core::AemConfig;
use aem_core::ChatButton;
use aem_core::ChatParticipant;
use aem_core::ChatRequest;
use aem_core::ImageReference;
use aem_core::ResponseSink;
use aem_lm_client::ModelRegistry;
use aem_lm_client::OpenAiChatModel;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Send one line to the assistant, e.g. `aem chat /collection cards`.
#[derive(Debug, clap::Parser)]
pub struct ChatCli {
    /// Chat line; a leading `/docs`, `/info`, `/collection`, `/create`,
    /// `/issues` or `/vision` selects the command.
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub line: Vec<String>,

    /// Image to attach (jpg, jpeg, png, gif, bmp, tiff). Repeatable.
    #[arg(long = "image", short = 'i', value_name = "FILE")]
    pub images: Vec<PathBuf>,

    /// Project root used for styles, scripts and the GitHub remote.
    /// Defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,
}

impl ChatCli {
    pub async fn run(self, config: AemConfig) -> Result<()> {
        let workspace = match self.workspace {
            Some(dir) => dir,
            None => std::env::current_dir().context("failed to read current directory")?,
        };

        let mut request = ChatRequest::parse(&self.line.join(" ")).with_workspace_root(&workspace);
        for path in &self.images {
            let image = ImageReference::from_path(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let Some(image) = image else {
                bail!("{} is not a supported image", path.display());
            };
            request = request.with_reference(image);
        }

        let models = model_registry(&config);
        let participant = ChatParticipant::new(config, models, Some(&workspace))
            .context("failed to set up the assistant")?;

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        let mut sink = TerminalSink::default();
        let result = participant.handle(&request, &mut sink, cancel).await;
        sink.finish();

        for followup in participant.followups(&result) {
            let command = followup
                .command
                .map(|command| format!("/{command} "))
                .unwrap_or_default();
            eprintln!("Try: {command}{} ({})", followup.prompt, followup.label);
        }
        Ok(())
    }
}

/// The configured model, or an empty registry when it cannot be built.
fn model_registry(config: &AemConfig) -> ModelRegistry {
    match OpenAiChatModel::from_config(&config.model) {
        Ok(model) => ModelRegistry::new().with_model(Arc::new(model)),
        Err(err) => {
            warn!("language model disabled: {err}");
            ModelRegistry::new()
        }
    }
}

/// Markdown to stdout; progress and buttons to stderr.
#[derive(Debug, Default)]
struct TerminalSink {
    ends_with_newline: bool,
    wrote_markdown: bool,
}

impl TerminalSink {
    fn finish(&mut self) {
        if self.wrote_markdown && !self.ends_with_newline {
            println!();
        }
    }
}

impl ResponseSink for TerminalSink {
    fn progress(&mut self, message: &str) {
        eprintln!("» {message}");
    }

    fn markdown(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
        self.wrote_markdown = true;
        self.ends_with_newline = text.ends_with('\n');
    }

    fn button(&mut self, button: ChatButton) {
        let arguments = serde_json::to_string(&button.arguments).unwrap_or_default();
        eprintln!("[{}] {} {arguments}", button.title, button.command);
    }
}
