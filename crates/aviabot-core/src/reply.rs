use serde::{Deserialize, Serialize};

/// A text message received from the chat channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Stable key identifying one conversation participant (chat id).
    pub identity: String,
    /// Display name supplied by the channel, used in greetings and bookings.
    pub display_name: String,
    /// The raw message text.
    pub text: String,
}

impl IncomingMessage {
    pub fn new(
        identity: impl Into<String>,
        display_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            display_name: display_name.into(),
            text: text.into(),
        }
    }
}

/// Keyboard hint attached to an outgoing reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyMarkup {
    /// Show a one-tap reply keyboard; inner vectors are rows.
    Keyboard(Vec<Vec<String>>),
    /// Remove any previously shown reply keyboard.
    Remove,
}

/// One outgoing message produced by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub markup: Option<ReplyMarkup>,
    /// Rendered ticket bytes, sent as a photo when present.
    pub photo: Option<Vec<u8>>,
}

impl Reply {
    /// Plain text reply with no keyboard change.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: None,
            photo: None,
        }
    }

    /// Text reply that also removes the current reply keyboard.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: Some(ReplyMarkup::Remove),
            photo: None,
        }
    }

    /// Text reply offering a one-tap keyboard.
    pub fn with_keyboard(text: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            text: text.into(),
            markup: Some(ReplyMarkup::Keyboard(rows)),
            photo: None,
        }
    }

    /// Photo reply with a caption.
    pub fn photo(text: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            text: text.into(),
            markup: None,
            photo: Some(bytes),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_constructors() {
        let r = Reply::text("hi");
        assert_eq!(r.text, "hi");
        assert!(r.markup.is_none());
        assert!(r.photo.is_none());

        let r = Reply::plain("bye");
        assert_eq!(r.markup, Some(ReplyMarkup::Remove));

        let r = Reply::with_keyboard("pick", vec![vec!["1".to_string(), "2".to_string()]]);
        match r.markup {
            Some(ReplyMarkup::Keyboard(rows)) => assert_eq!(rows[0].len(), 2),
            _ => panic!("expected keyboard"),
        }

        let r = Reply::photo("ticket", vec![1, 2, 3]);
        assert_eq!(r.photo.unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_reply_serialization() {
        let r = Reply::with_keyboard("pick", vec![vec!["Да".to_string(), "Нет".to_string()]]);
        let json = serde_json::to_string(&r).unwrap();
        let back: Reply = serde_json::from_str(&json).unwrap();
        assert_eq!(back.text, "pick");
        assert_eq!(back.markup, r.markup);
    }
}
