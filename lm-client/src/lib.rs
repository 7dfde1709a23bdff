/*!
# Language Model Client

The seam between chat handlers and whatever model answers them.

Handlers only see [`LanguageModel`]: role-tagged messages and a
cancellation token go in, a finite stream of text fragments comes out. The
stream is consumed once; cancelling the token ends it early and the
fragments already yielded remain a valid prefix of the answer.

```text
Handler
  └─> ModelRegistry::select(selector)
        └─> LanguageModel::send_request(messages, cancel)
              └─> TextStream (fragments) ──> ResponseSink / collect_text
```

[`OpenAiChatModel`] talks to any OpenAI-compatible `chat/completions`
endpoint over server-sent events. With the `test-support` feature a
scripted [`FakeModel`] is available for tests in dependent crates.
*/

mod config;
mod error;
#[cfg(any(test, feature = "test-support"))]
mod fake;
mod model;
mod openai;
mod registry;

pub use config::ModelProviderConfig;
pub use error::LmError;
pub use error::Result;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeModel;
pub use model::LanguageModel;
pub use model::ModelInfo;
pub use model::TextStream;
pub use model::collect_text;
pub use openai::OpenAiChatModel;
pub use registry::ModelRegistry;
pub use registry::ModelSelector;
