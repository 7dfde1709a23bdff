use aem_block_collection::BlockCollectionClient;
use aem_block_collection::collect_files;
use aem_block_collection::render_file_tree;
use aem_core::AemConfig;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;

/// Browse the public block collection.
#[derive(Debug, clap::Parser)]
pub struct BlocksCli {
    #[command(subcommand)]
    pub subcommand: BlocksSubcommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum BlocksSubcommand {
    /// List every block in the collection.
    List,

    /// Print the file tree and sources of one block.
    Show(ShowArgs),
}

#[derive(Debug, clap::Parser)]
pub struct ShowArgs {
    /// Block name, e.g. `cards`.
    pub name: String,

    /// Print the tree only.
    #[arg(long)]
    pub tree: bool,
}

impl BlocksCli {
    pub async fn run(self, config: AemConfig) -> Result<()> {
        let client = BlockCollectionClient::new(config.blocks);
        match self.subcommand {
            BlocksSubcommand::List => run_list(&client).await,
            BlocksSubcommand::Show(args) => run_show(&client, args).await,
        }
    }
}

async fn run_list(client: &BlockCollectionClient) -> Result<()> {
    let blocks = client.list_blocks().await;
    if blocks.is_empty() {
        bail!(
            "no blocks found at {}; check the network and blocks.base_url",
            client.config().base_url
        );
    }
    for block in blocks {
        println!("{block}");
    }
    Ok(())
}

async fn run_show(client: &BlockCollectionClient, args: ShowArgs) -> Result<()> {
    let block = client
        .block_content(&args.name)
        .await
        .with_context(|| format!("failed to fetch block `{}`", args.name))?;

    print!("{}", render_file_tree(&block));
    if args.tree {
        return Ok(());
    }
    for file in collect_files(&block) {
        println!();
        println!("--- {} ({})", file.path, file.language);
        println!("{}", file.content.trim_end());
    }
    Ok(())
}
