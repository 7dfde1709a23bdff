use crate::error::Result;
use aem_protocol::ChatMessage;
use async_trait::async_trait;
use futures::Stream;
use futures::StreamExt;
use serde::Deserialize;
use serde::Serialize;
use std::pin::Pin;
use tokio_util::sync::CancellationToken;

/// Lazily produced, finite, non-restartable sequence of completion text.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Identity of a model as seen by selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub vendor: String,
    pub family: String,
    pub max_input_tokens: usize,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn info(&self) -> &ModelInfo;

    /// Starts a completion. The returned stream ends without error once
    /// `cancel` fires.
    async fn send_request(
        &self,
        messages: Vec<ChatMessage>,
        cancel: CancellationToken,
    ) -> Result<TextStream>;
}

/// Drains a stream into one string. The first stream error is returned.
pub async fn collect_text(mut stream: TextStream) -> Result<String> {
    let mut text = String::new();
    while let Some(fragment) = stream.next().await {
        text.push_str(&fragment?);
    }
    Ok(text)
}
