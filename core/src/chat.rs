use aem_protocol::ChatCommand;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff"];

/// An image attached to a chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageReference {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// MIME type for a file name with a supported image extension.
    pub fn mime_type_for(path: &Path) -> Option<String> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return None;
        }
        Some(if extension == "jpg" {
            "image/jpeg".to_string()
        } else {
            format!("image/{extension}")
        })
    }

    /// Read an image file. `Ok(None)` when the extension is not an image.
    pub async fn from_path(path: &Path) -> std::io::Result<Option<Self>> {
        let Some(mime_type) = Self::mime_type_for(path) else {
            return Ok(None);
        };
        let data = tokio::fs::read(path).await?;
        Ok(Some(Self { mime_type, data }))
    }
}

/// One turn addressed to the participant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatRequest {
    pub command: Option<ChatCommand>,
    pub prompt: String,
    pub references: Vec<ImageReference>,
    /// Root of the user's project, used for project-level context
    pub workspace_root: Option<PathBuf>,
}

impl ChatRequest {
    pub fn new(command: Option<ChatCommand>, prompt: impl Into<String>) -> Self {
        Self {
            command,
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Split a leading `/command` off a raw input line.
    pub fn parse(line: &str) -> Self {
        let (command, prompt) = ChatCommand::split_prompt(line);
        Self::new(command, prompt)
    }

    pub fn with_reference(mut self, reference: ImageReference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }
}

/// An action offered below a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatButton {
    pub command: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(default)]
    pub arguments: Vec<serde_json::Value>,
}

/// Suggested next prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Followup {
    pub prompt: String,
    pub label: String,
    pub command: Option<ChatCommand>,
}

/// Receives the streamed parts of one response.
pub trait ResponseSink: Send {
    fn progress(&mut self, message: &str);
    fn markdown(&mut self, text: &str);
    fn button(&mut self, button: ChatButton);
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePart {
    Progress(String),
    Markdown(String),
    Button(ChatButton),
}

/// Sink that keeps every part in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    parts: Vec<ResponsePart>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parts(&self) -> &[ResponsePart] {
        &self.parts
    }

    /// All markdown concatenated.
    pub fn markdown_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ResponsePart::Markdown(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn progress_messages(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ResponsePart::Progress(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn buttons(&self) -> Vec<&ChatButton> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ResponsePart::Button(button) => Some(button),
                _ => None,
            })
            .collect()
    }
}

impl ResponseSink for RecordingSink {
    fn progress(&mut self, message: &str) {
        self.parts.push(ResponsePart::Progress(message.to_string()));
    }

    fn markdown(&mut self, text: &str) {
        self.parts.push(ResponsePart::Markdown(text.to_string()));
    }

    fn button(&mut self, button: ChatButton) {
        self.parts.push(ResponsePart::Button(button));
    }
}

/// Outcome metadata of a handled request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResult {
    pub command: Option<ChatCommand>,
    /// Set when the handler failed; the user already saw a message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
