//! Types shared between the chat router, the language-model client and the
//! retrieval crates.

pub mod command;
pub mod models;
pub mod prompt;

pub use command::ChatCommand;
pub use models::ChatMessage;
pub use models::ContentPart;
pub use models::Role;
pub use prompt::PromptProps;
pub use prompt::assemble_prompt;
