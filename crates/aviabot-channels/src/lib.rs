//! Chat transport adapters. The engine only sees [`ChannelMessage`]s in and
//! [`aviabot_core::Reply`]s out; everything Telegram-specific stays here.

pub mod channel;
pub mod telegram;

pub use channel::{Channel, ChannelEvent, ChannelMessage};
pub use telegram::TelegramChannel;
