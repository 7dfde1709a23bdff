use crate::config::BlockCollectionConfig;
use crate::error::BlockError;
use crate::error::Result;
use crate::listing::DirectoryListing;
use crate::listing::parse_listing;
use crate::tree::BlockNode;
use futures::FutureExt;
use futures::future::BoxFuture;
use log::debug;
use log::error;
use log::info;
use tokio::sync::OnceCell;

/// Reads block sources from the collection CDN.
#[derive(Debug)]
pub struct BlockCollectionClient {
    client: reqwest::Client,
    config: BlockCollectionConfig,
    blocks: OnceCell<Vec<String>>,
}

impl BlockCollectionClient {
    pub fn new(config: BlockCollectionConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            blocks: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &BlockCollectionConfig {
        &self.config
    }

    /// Entries of `folder` (relative to the base URL, ending with `/`).
    pub async fn try_list_directory(&self, folder: &str) -> Result<DirectoryListing> {
        let url = format!("{}{folder}", self.config.base_url);
        debug!("Listing {url}");
        let html = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(parse_listing(&html, folder))
    }

    /// Like [`Self::try_list_directory`], but failures become an empty
    /// listing.
    pub async fn list_directory(&self, folder: &str) -> DirectoryListing {
        match self.try_list_directory(folder).await {
            Ok(listing) => listing,
            Err(err) => {
                error!("Failed to list {folder}: {err}");
                DirectoryListing::default()
            }
        }
    }

    /// Names of every block in the collection. Kept after the first
    /// non-empty answer.
    pub async fn list_blocks(&self) -> Vec<String> {
        let folder = format!("{}/", self.config.blocks_folder.trim_matches('/'));
        let loaded = self
            .blocks
            .get_or_try_init(|| async {
                let listing = self.list_directory(&folder).await;
                if listing.folders.is_empty() {
                    Err(())
                } else {
                    info!("Block collection lists {} blocks", listing.folders.len());
                    Ok(listing.folders)
                }
            })
            .await;
        loaded.cloned().unwrap_or_default()
    }

    pub async fn has_block(&self, name: &str) -> bool {
        self.list_blocks().await.iter().any(|block| block == name)
    }

    pub async fn file_content(&self, path: &str) -> Result<String> {
        let url = format!("{}{path}", self.config.base_url);
        debug!("Fetching {url}");
        Ok(self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }

    /// Full source tree of one block, files before sub-folders.
    pub async fn block_content(&self, name: &str) -> Result<BlockNode> {
        let path = format!("{}/{name}", self.config.blocks_folder.trim_matches('/'));
        let children = self.folder_children(path.clone()).await?;
        if children.is_empty() {
            return Err(BlockError::NotFound(name.to_string()));
        }
        Ok(BlockNode::Folder {
            name: name.to_string(),
            path,
            children,
        })
    }

    fn folder_children(&self, path: String) -> BoxFuture<'_, Result<Vec<BlockNode>>> {
        async move {
            let listing = self.try_list_directory(&format!("{path}/")).await?;
            let mut children = Vec::with_capacity(listing.files.len() + listing.folders.len());

            for file in listing.files {
                let file_path = format!("{path}/{file}");
                let content = self.file_content(&file_path).await?;
                children.push(BlockNode::File {
                    name: file,
                    path: file_path,
                    content,
                });
            }

            for folder in listing.folders {
                let folder_path = format!("{path}/{folder}");
                let nested = self.folder_children(folder_path.clone()).await?;
                children.push(BlockNode::Folder {
                    name: folder,
                    path: folder_path,
                    children: nested,
                });
            }
            Ok(children)
        }
        .boxed()
    }
}
