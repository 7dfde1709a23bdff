//! Prompt assembly.
//!
//! Handlers describe a prompt as a system message plus [`PromptProps`]; the
//! assembler turns that into the ordered message list the language model
//! receives. It never touches the network, so prompt construction is unit
//! tested here and in the handlers without a model.

use crate::models::ChatMessage;

/// Structured inputs of a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptProps {
    /// The user's question; sent last.
    pub user_query: String,

    /// Messages placed between the system message and the user query, in
    /// insertion order.
    pub context: Vec<ChatMessage>,
}

impl PromptProps {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            context: Vec::new(),
        }
    }

    pub fn with_user_context(mut self, text: impl Into<String>) -> Self {
        self.context.push(ChatMessage::user(text));
        self
    }

    pub fn with_assistant_context(mut self, text: impl Into<String>) -> Self {
        self.context.push(ChatMessage::assistant(text));
        self
    }

    pub fn with_image(mut self, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        self.context.push(ChatMessage::user_image(mime_type, data));
        self
    }
}

/// Builds `[system, context.., user_query]`, skipping an empty system
/// message or an empty query.
pub fn assemble_prompt(system_message: &str, props: &PromptProps) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(props.context.len() + 2);
    if !system_message.trim().is_empty() {
        messages.push(ChatMessage::system(system_message));
    }
    messages.extend(props.context.iter().cloned());
    if !props.user_query.trim().is_empty() {
        messages.push(ChatMessage::user(props.user_query.clone()));
    }
    messages
}
