pub mod blocks_cmd;
pub mod chat_cmd;
pub mod logging;
pub mod search_cmd;

use aem_core::AemConfig;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

pub use blocks_cmd::BlocksCli;
pub use chat_cmd::ChatCli;
pub use search_cmd::SearchCli;

/// AEM Edge Delivery Services assistant.
///
/// Subcommands:
/// - `search`: rank documentation pages for a question
/// - `chat`: answer one chat line, optionally with a `/command` prefix
/// - `blocks`: browse the public block collection
#[derive(Debug, Parser)]
#[command(name = "aem", version)]
pub struct Cli {
    /// Path to config.toml; defaults to `$AEM_COPILOT_HOME/config.toml`.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Find documentation pages relevant to a question.
    Search(SearchCli),

    /// Send one chat line to the assistant.
    Chat(ChatCli),

    /// List or show blocks from the block collection.
    Blocks(BlocksCli),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = AemConfig::load(self.config.as_deref())
            .context("failed to load configuration")?;
        match self.command {
            Command::Search(cli) => cli.run(config).await,
            Command::Chat(cli) => cli.run(config).await,
            Command::Blocks(cli) => cli.run(config).await,
        }
    }
}
