use aem_cli::Cli;
use aem_cli::logging;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    Cli::parse().run().await
}
