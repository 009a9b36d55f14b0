use crate::channel::{Channel, ChannelEvent, ChannelMessage};
use aviabot_core::{AviabotError, AviabotResult, Reply, ReplyMarkup};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// Telegram Bot API channel adapter.
///
/// Uses the Telegram Bot HTTP API for sending replies and long-polling
/// (`getUpdates`) for receiving messages. Incoming messages are forwarded
/// through a `tokio::sync::mpsc` channel as [`ChannelEvent`]s.
pub struct TelegramChannel {
    bot_token: String,
    client: reqwest::Client,
    event_tx: mpsc::Sender<ChannelEvent>,
    event_rx: Option<mpsc::Receiver<ChannelEvent>>,
}

// ── Telegram API types ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct TelegramUpdate {
    update_id: i64,
    message: Option<TelegramMessagePayload>,
}

#[derive(Debug, Deserialize)]
struct TelegramMessagePayload {
    chat: TelegramChat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramChat {
    id: i64,
    #[serde(default)]
    first_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum TelegramReplyMarkup {
    Keyboard {
        keyboard: Vec<Vec<String>>,
        resize_keyboard: bool,
        selective: bool,
    },
    Remove {
        remove_keyboard: bool,
    },
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<TelegramReplyMarkup>,
}

fn to_telegram_markup(markup: &ReplyMarkup) -> TelegramReplyMarkup {
    match markup {
        ReplyMarkup::Keyboard(rows) => TelegramReplyMarkup::Keyboard {
            keyboard: rows.clone(),
            resize_keyboard: true,
            selective: true,
        },
        ReplyMarkup::Remove => TelegramReplyMarkup::Remove {
            remove_keyboard: true,
        },
    }
}

// ── Implementation ──────────────────────────────────────────────────────────

impl TelegramChannel {
    /// Create a new `TelegramChannel`.
    ///
    /// * `bot_token` – The bot token obtained from @BotFather.
    /// * `event_buffer` – Capacity of the internal mpsc event buffer.
    pub fn new(bot_token: impl Into<String>, event_buffer: usize) -> Self {
        let (event_tx, event_rx) = mpsc::channel(event_buffer);
        Self {
            bot_token: bot_token.into(),
            client: reqwest::Client::new(),
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    /// Take the receiving half of the event channel.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<ChannelEvent>> {
        self.event_rx.take()
    }

    /// Start long-polling the Telegram `getUpdates` endpoint.
    ///
    /// Runs indefinitely, forwarding every incoming text message as a
    /// [`ChannelEvent::MessageReceived`]. Should be spawned onto a Tokio
    /// task. Updates within one chat arrive in order, which is what keeps
    /// per-identity message handling sequential.
    pub async fn poll_updates(&self) -> AviabotResult<()> {
        let mut offset: Option<i64> = None;

        loop {
            let url = self.api_url("getUpdates");

            let mut params: Vec<(&str, String)> = vec![("timeout", "30".to_string())];
            if let Some(off) = offset {
                params.push(("offset", off.to_string()));
            }

            let response = self
                .client
                .get(&url)
                .query(&params)
                .send()
                .await
                .map_err(|e| AviabotError::Channel(format!("Telegram poll error: {e}")))?;

            let body: TelegramResponse<Vec<TelegramUpdate>> = response
                .json()
                .await
                .map_err(|e| AviabotError::Channel(format!("Telegram parse error: {e}")))?;

            if !body.ok {
                return Err(AviabotError::Channel(format!(
                    "Telegram API error: {}",
                    body.description.unwrap_or_default()
                )));
            }

            if let Some(updates) = body.result {
                for update in updates {
                    // Advance the offset so we do not receive this update again.
                    offset = Some(update.update_id + 1);

                    if let Some(msg) = update.message {
                        if let Some(text) = msg.text {
                            let channel_message = ChannelMessage {
                                chat_id: msg.chat.id.to_string(),
                                sender_name: msg.chat.first_name.unwrap_or_default(),
                                text,
                            };
                            debug!(
                                chat_id = %channel_message.chat_id,
                                update_id = update.update_id,
                                "update forwarded"
                            );

                            // Best-effort send; if the receiver is dropped we stop.
                            if self
                                .event_tx
                                .send(ChannelEvent::MessageReceived(channel_message))
                                .await
                                .is_err()
                            {
                                return Ok(());
                            }
                        }
                    }
                }
            }
        }
    }

    async fn send_text(&self, chat_id: &str, reply: &Reply) -> AviabotResult<()> {
        let url = self.api_url("sendMessage");

        let payload = SendMessageRequest {
            chat_id,
            text: &reply.text,
            reply_markup: reply.markup.as_ref().map(to_telegram_markup),
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AviabotError::Channel(format!("Telegram send error: {e}")))?;

        check_ok(response).await?;
        debug!(chat_id, "message sent");
        Ok(())
    }

    async fn send_photo(&self, chat_id: &str, reply: &Reply, bytes: Vec<u8>) -> AviabotResult<()> {
        let url = self.api_url("sendPhoto");

        let part = reqwest::multipart::Part::bytes(bytes).file_name("ticket.png");
        let mut form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", part);
        if !reply.text.is_empty() {
            form = form.text("caption", reply.text.clone());
        }

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AviabotError::Channel(format!("Telegram sendPhoto error: {e}")))?;

        check_ok(response).await?;
        debug!(chat_id, "photo sent");
        Ok(())
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{}", self.bot_token, method)
    }
}

async fn check_ok(response: reqwest::Response) -> AviabotResult<()> {
    let body: TelegramResponse<serde_json::Value> = response
        .json()
        .await
        .map_err(|e| AviabotError::Channel(format!("Telegram parse error: {e}")))?;

    if !body.ok {
        return Err(AviabotError::Channel(format!(
            "Telegram request failed: {}",
            body.description.unwrap_or_default()
        )));
    }
    Ok(())
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, chat_id: &str, reply: &Reply) -> AviabotResult<()> {
        match &reply.photo {
            Some(bytes) => self.send_photo(chat_id, reply, bytes.clone()).await,
            None => self.send_text(chat_id, reply).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_markup_serialization() {
        let markup = to_telegram_markup(&ReplyMarkup::Keyboard(vec![
            vec!["1".to_string(), "2".to_string(), "3".to_string()],
            vec!["4".to_string(), "5".to_string()],
        ]));
        let json = serde_json::to_value(&markup).unwrap();
        assert_eq!(json["resize_keyboard"], true);
        assert_eq!(json["selective"], true);
        assert_eq!(json["keyboard"][1][0], "4");
    }

    #[test]
    fn test_remove_markup_serialization() {
        let markup = to_telegram_markup(&ReplyMarkup::Remove);
        let json = serde_json::to_value(&markup).unwrap();
        assert_eq!(json["remove_keyboard"], true);
    }

    #[test]
    fn test_send_message_skips_absent_markup() {
        let payload = SendMessageRequest {
            chat_id: "42",
            text: "hi",
            reply_markup: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("reply_markup").is_none());
    }

    #[test]
    fn test_update_parsing() {
        let raw = r#"{
            "ok": true,
            "result": [{
                "update_id": 7,
                "message": {
                    "chat": {"id": 123, "first_name": "Анна"},
                    "text": "/ticket"
                }
            }]
        }"#;
        let body: TelegramResponse<Vec<TelegramUpdate>> = serde_json::from_str(raw).unwrap();
        assert!(body.ok);
        let updates = body.result.unwrap();
        assert_eq!(updates[0].update_id, 7);
        let msg = updates[0].message.as_ref().unwrap();
        assert_eq!(msg.chat.id, 123);
        assert_eq!(msg.text.as_deref(), Some("/ticket"));
    }
}
