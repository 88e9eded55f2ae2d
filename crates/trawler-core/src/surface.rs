use async_trait::async_trait;
use thiserror::Error;

use trawler_types::message::{MessageEdit, OutboundMessage, PostedMessage};
use trawler_types::models::MessageRef;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The message, channel or interaction no longer exists.
    #[error("message or channel no longer exists")]
    NotFound,

    #[error("missing permission: {0}")]
    Forbidden(String),

    #[error("rate limited")]
    RateLimited,

    #[error("{0}")]
    Other(String),
}

/// Message operations on the chat platform. None of these messages are the
/// source of truth for a report; they only mirror its display state.
#[async_trait]
pub trait ChatSurface: Send + Sync {
    async fn post_message(&self, channel: &str, message: OutboundMessage) -> Result<MessageRef, SurfaceError>;

    async fn fetch_message(&self, target: &MessageRef) -> Result<PostedMessage, SurfaceError>;

    async fn edit_message(&self, target: &MessageRef, edit: MessageEdit) -> Result<(), SurfaceError>;
}

/// Replies bound to one inbound interaction (a button press).
#[async_trait]
pub trait InteractionResponder: Send + Sync {
    /// Tell the platform the press was received so the control does not
    /// appear unresponsive.
    async fn acknowledge(&self) -> Result<(), SurfaceError>;

    /// Private notice to whoever triggered the interaction.
    async fn notify(&self, content: &str) -> Result<(), SurfaceError>;
}
