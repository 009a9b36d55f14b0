use aviabot_core::{AviabotResult, IncomingMessage, Reply};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A text message received from a chat transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// Chat id; the booking flow's identity.
    pub chat_id: String,
    /// Sender's first name as supplied by the transport.
    pub sender_name: String,
    pub text: String,
}

impl ChannelMessage {
    pub fn into_incoming(self) -> IncomingMessage {
        IncomingMessage::new(self.chat_id, self.sender_name, self.text)
    }
}

#[derive(Debug)]
pub enum ChannelEvent {
    MessageReceived(ChannelMessage),
}

#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;
    /// Deliver one engine reply to the given chat.
    async fn send(&self, chat_id: &str, reply: &Reply) -> AviabotResult<()>;
}
