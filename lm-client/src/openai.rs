use crate::config::ModelProviderConfig;
use crate::error::LmError;
use crate::error::Result;
use crate::model::LanguageModel;
use crate::model::ModelInfo;
use crate::model::TextStream;
use aem_protocol::ChatMessage;
use aem_protocol::ContentPart;
use aem_protocol::Role;
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use futures::future;
use futures::stream;
use serde::Deserialize;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::trace;

const DONE_SENTINEL: &str = "[DONE]";

/// Streaming client for OpenAI-compatible `chat/completions` endpoints.
pub struct OpenAiChatModel {
    info: ModelInfo,
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiChatModel {
    /// Builds the client, reading the API key from the configured
    /// environment variable.
    pub fn from_config(config: &ModelProviderConfig) -> Result<Self> {
        let api_key = match &config.api_key_env {
            Some(var) => Some(
                std::env::var(var).map_err(|_| LmError::MissingApiKey(var.clone()))?,
            ),
            None => None,
        };
        Ok(Self::with_api_key(config, api_key))
    }

    pub fn with_api_key(config: &ModelProviderConfig, api_key: Option<String>) -> Self {
        Self {
            info: ModelInfo {
                id: format!("{}/{}", config.vendor, config.model),
                vendor: config.vendor.clone(),
                family: config.family.clone(),
                max_input_tokens: config.max_input_tokens,
            },
            client: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    async fn send_request(
        &self,
        messages: Vec<ChatMessage>,
        cancel: CancellationToken,
    ) -> Result<TextStream> {
        let body = CompletionRequest {
            model: &self.model,
            stream: true,
            messages: messages.iter().map(WireMessage::from).collect(),
        };
        debug!(
            "sending {} messages to {} ({})",
            body.messages.len(),
            self.endpoint,
            self.model
        );

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("completion cancelled before the response arrived");
                return Ok(Box::pin(stream::empty()));
            }
            response = request.send() => response?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let fragments = response
            .bytes_stream()
            .eventsource()
            .take_while(|event| {
                future::ready(!matches!(event, Ok(event) if event.data.trim() == DONE_SENTINEL))
            })
            .filter_map(|event| {
                future::ready(match event {
                    Ok(event) => parse_delta(&event.data).transpose(),
                    Err(err) => Some(Err(LmError::Stream(err.to_string()))),
                })
            })
            .take_until(cancel.cancelled_owned());

        Ok(Box::pin(fragments))
    }
}

/// Content fragment of one streamed chunk; `None` for role-only or empty
/// deltas.
fn parse_delta(data: &str) -> Result<Option<String>> {
    trace!("stream event: {data}");
    let chunk: CompletionChunk = serde_json::from_str(data)?;
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty()))
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    stream: bool,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize, PartialEq)]
struct WireMessage {
    role: Role,
    content: WireContent,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Parts(Vec<WirePart>),
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WirePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize, PartialEq)]
struct ImageUrl {
    url: String,
    detail: &'static str,
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        let content = if message.has_images() {
            WireContent::Parts(
                message
                    .content
                    .iter()
                    .map(|part| match part {
                        ContentPart::Text { text } => WirePart::Text { text: text.clone() },
                        ContentPart::Image { .. } => WirePart::ImageUrl {
                            image_url: ImageUrl {
                                url: part.image_data_url().unwrap_or_default(),
                                detail: "auto",
                            },
                        },
                    })
                    .collect(),
            )
        } else {
            WireContent::Text(message.text())
        };
        Self {
            role: message.role,
            content,
        }
    }
}

#[derive(Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn delta_content_extracted() {
        assert_eq!(
            parse_delta(r#"{"choices":[{"delta":{"content":"Hel"}}]}"#).unwrap(),
            Some("Hel".to_string())
        );
        assert_eq!(
            parse_delta(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#).unwrap(),
            None
        );
        assert_eq!(parse_delta(r#"{"choices":[]}"#).unwrap(), None);
        assert!(parse_delta("not json").is_err());
    }

    #[test]
    fn text_messages_serialize_as_strings() {
        let wire = WireMessage::from(&ChatMessage::system("be brief"));
        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            json!({"role": "system", "content": "be brief"})
        );
    }

    #[test]
    fn image_messages_serialize_as_parts() {
        let wire = WireMessage::from(&ChatMessage::user_image("image/png", b"png".to_vec()));
        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            json!({
                "role": "user",
                "content": [{
                    "type": "image_url",
                    "image_url": {"url": "data:image/png;base64,cG5n", "detail": "auto"}
                }]
            })
        );
    }

    #[test]
    fn endpoint_joins_base_url() {
        let config = ModelProviderConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        };
        let model = OpenAiChatModel::with_api_key(&config, None);
        assert_eq!(model.endpoint, "http://localhost:8080/v1/chat/completions");
        assert_eq!(model.info().id, "copilot/gpt-4o");
    }
}
