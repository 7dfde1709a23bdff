use crate::error::LmError;
use crate::error::Result;
use crate::model::LanguageModel;
use crate::model::ModelInfo;
use crate::model::TextStream;
use aem_protocol::ChatMessage;
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::PoisonError;
use tokio_util::sync::CancellationToken;

enum Scripted {
    Fragments(Vec<String>),
    Failure(u16),
}

/// Scripted model for tests. Each request consumes the next scripted reply
/// (an empty stream once the script is exhausted) and is recorded.
pub struct FakeModel {
    info: ModelInfo,
    replies: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeModel {
    pub fn new() -> Self {
        Self::with_identity("copilot", "gpt-4o")
    }

    pub fn with_identity(vendor: &str, family: &str) -> Self {
        Self {
            info: ModelInfo {
                id: format!("fake-{vendor}-{family}"),
                vendor: vendor.to_string(),
                family: family.to_string(),
                max_input_tokens: 8_192,
            },
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues a reply streamed as the given fragments.
    pub fn reply<I, S>(self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Scripted::Fragments(
            fragments.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Queues a reply that fails with the given HTTP status.
    pub fn fail(self, status: u16) -> Self {
        self.push(Scripted::Failure(status));
        self
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn push(&self, reply: Scripted) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }
}

impl Default for FakeModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    async fn send_request(
        &self,
        messages: Vec<ChatMessage>,
        cancel: CancellationToken,
    ) -> Result<TextStream> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(messages);
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match reply {
            Some(Scripted::Failure(status)) => Err(LmError::Status {
                status,
                body: "scripted failure".to_string(),
            }),
            Some(Scripted::Fragments(fragments)) => Ok(Box::pin(
                stream::iter(fragments.into_iter().map(Ok))
                    .take_until(cancel.cancelled_owned()),
            )),
            None => Ok(Box::pin(stream::empty())),
        }
    }
}
