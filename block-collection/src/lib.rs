//! Access to the public AEM block collection and rendering of block
//! structures as Markdown.

mod client;
mod config;
mod error;
mod listing;
mod template;
mod tree;

pub use client::BlockCollectionClient;
pub use config::BlockCollectionConfig;
pub use error::BlockError;
pub use error::Result;
pub use listing::DirectoryListing;
pub use listing::parse_listing;
pub use template::BlockTemplate;
pub use template::NodeKind;
pub use template::TemplateFile;
pub use template::TemplateNode;
pub use template::render_block_markdown;
pub use tree::BlockFile;
pub use tree::BlockNode;
pub use tree::collect_files;
pub use tree::language_for;
pub use tree::render_file_tree;
