use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumIter;
use strum_macros::EnumString;

/// Slash commands understood by the chat participant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatCommand {
    /// Generate a new block from a description.
    Create,
    /// Browse the public block collection.
    Collection,
    /// Work with the repository's GitHub issues.
    Issues,
    /// Match an attached image to a collection block.
    Vision,
    /// Answer from the documentation index.
    Docs,
    /// General block information.
    Info,
}

impl ChatCommand {
    /// Splits a leading `/command` off a chat line.
    ///
    /// Unknown commands are left in the prompt so the default handler sees
    /// the full text.
    pub fn split_prompt(line: &str) -> (Option<ChatCommand>, &str) {
        let trimmed = line.trim_start();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return (None, line.trim());
        };
        let (name, prompt) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        match name.parse::<ChatCommand>() {
            Ok(command) => (Some(command), prompt.trim()),
            Err(_) => (None, line.trim()),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ChatCommand::Create => "Create a new block",
            ChatCommand::Collection => "Fetch a block from the block collection",
            ChatCommand::Issues => "Fetch and explain GitHub issues",
            ChatCommand::Vision => "Create a block from an image",
            ChatCommand::Docs => "Ask the documentation",
            ChatCommand::Info => "General information about blocks",
        }
    }
}
