//! Chat participant for AEM Edge Delivery Services projects.
//!
//! [`ChatParticipant`] routes a parsed [`ChatRequest`] to one of the command
//! handlers and streams the answer into a [`ResponseSink`].

mod chat;
pub mod config;
mod error;
mod handlers;
mod participant;
mod project;
pub mod prompts;

pub use chat::ChatButton;
pub use chat::ChatRequest;
pub use chat::ChatResult;
pub use chat::Followup;
pub use chat::ImageReference;
pub use chat::RecordingSink;
pub use chat::ResponsePart;
pub use chat::ResponseSink;
pub use config::AemConfig;
pub use config::find_aem_home;
pub use error::CoreError;
pub use error::Result;
pub use participant::ChatParticipant;
pub use participant::random_greeting;
pub use project::ProjectContext;
