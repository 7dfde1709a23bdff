use serde::Deserialize;
use serde::Serialize;

/// Where block sources are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCollectionConfig {
    /// Directory-listing root, ending with `/`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Folder holding one sub-folder per block
    #[serde(default = "default_blocks_folder")]
    pub blocks_folder: String,
}

fn default_base_url() -> String {
    "https://cdn.jsdelivr.net/gh/adobe/aem-block-collection@main/".to_string()
}

fn default_blocks_folder() -> String {
    "blocks".to_string()
}

impl Default for BlockCollectionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            blocks_folder: default_blocks_folder(),
        }
    }
}

impl BlockCollectionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.base_url.ends_with('/') {
            return Err(format!("base_url must end with '/': {}", self.base_url));
        }
        if self.blocks_folder.trim_matches('/').is_empty() {
            return Err("blocks_folder must not be empty".to_string());
        }
        Ok(())
    }
}
