use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;

/// Author of a chat message as understood by the language-model interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    Image {
        mime_type: String,
        /// Raw image bytes; encoded only when the message goes on the wire.
        #[serde(skip)]
        data: Vec<u8>,
    },
}

impl ContentPart {
    /// `data:` URL for image parts, `None` for text.
    pub fn image_data_url(&self) -> Option<String> {
        match self {
            ContentPart::Image { mime_type, data } => Some(format!(
                "data:{mime_type};base64,{}",
                BASE64_STANDARD.encode(data)
            )),
            ContentPart::Text { .. } => None,
        }
    }
}

/// One role-tagged message of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl ChatMessage {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentPart::Text { text: text.into() }],
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn user_image(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentPart::Image {
                mime_type: mime_type.into(),
                data,
            }],
        }
    }

    /// Concatenated text parts; images are skipped.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn has_images(&self) -> bool {
        self.content
            .iter()
            .any(|part| matches!(part, ContentPart::Image { .. }))
    }
}
