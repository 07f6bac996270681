//! Console adapter for development/testing
//!
//! Prints every outbound message instead of calling the platform. When a
//! channel is attached, each send is also pushed to it as a `Transcript`.

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::domain::entities::{ChatId, MessageId};
use crate::domain::traits::{Bot, BotInfo, SendOptions, SentMessage};

/// One outbound message as the console adapter saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    /// `text`, `sticker`, `animation`, `photo`, `video` or `voice`
    pub kind: &'static str,
    /// Text, or the file id followed by the caption if any
    pub body: String,
    pub reply_to: Option<MessageId>,
}

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
    sender: Option<mpsc::UnboundedSender<Transcript>>,
    next_id: AtomicI64,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self::with_info(BotInfo::new(0))
    }

    pub fn with_info(info: BotInfo) -> Self {
        Self {
            info,
            sender: None,
            next_id: AtomicI64::new(1),
        }
    }

    pub fn with_sender(mut self, sender: mpsc::UnboundedSender<Transcript>) -> Self {
        self.sender = Some(sender);
        self
    }

    fn emit(&self, chat_id: ChatId, kind: &'static str, body: String, options: &SendOptions) -> SentMessage {
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst);

        println!("[BOT -> {}] #{} {}: {}", chat_id, message_id, kind, body);
        if let Some(keyboard) = &options.keyboard {
            println!("  [Buttons] {}", keyboard.labels().collect::<Vec<_>>().join(" | "));
        }

        if let Some(sender) = &self.sender {
            let transcript = Transcript {
                chat_id,
                message_id,
                kind,
                body,
                reply_to: options.reply_to,
            };
            if sender.send(transcript).is_err() {
                tracing::debug!("Console transcript receiver dropped");
            }
        }

        SentMessage { chat_id, message_id }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn with_caption(file_id: &str, caption: Option<&str>) -> String {
    match caption {
        Some(caption) => format!("{} {}", file_id, caption),
        None => file_id.to_string(),
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn send_text(&self, chat_id: ChatId, text: &str, options: &SendOptions) -> Result<SentMessage, BotError> {
        Ok(self.emit(chat_id, "text", text.to_string(), options))
    }

    async fn send_sticker(&self, chat_id: ChatId, file_id: &str, options: &SendOptions) -> Result<SentMessage, BotError> {
        Ok(self.emit(chat_id, "sticker", file_id.to_string(), options))
    }

    async fn send_animation(&self, chat_id: ChatId, file_id: &str, caption: Option<&str>, options: &SendOptions) -> Result<SentMessage, BotError> {
        Ok(self.emit(chat_id, "animation", with_caption(file_id, caption), options))
    }

    async fn send_photo(&self, chat_id: ChatId, file_id: &str, caption: Option<&str>, options: &SendOptions) -> Result<SentMessage, BotError> {
        Ok(self.emit(chat_id, "photo", with_caption(file_id, caption), options))
    }

    async fn send_video(&self, chat_id: ChatId, file_id: &str, caption: Option<&str>, options: &SendOptions) -> Result<SentMessage, BotError> {
        Ok(self.emit(chat_id, "video", with_caption(file_id, caption), options))
    }

    async fn send_voice(&self, chat_id: ChatId, file_id: &str, options: &SendOptions) -> Result<SentMessage, BotError> {
        Ok(self.emit(chat_id, "voice", file_id.to_string(), options))
    }

    async fn set_webhook(&self, url: &str, _drop_pending_updates: bool) -> Result<(), BotError> {
        tracing::info!("Console mode: webhook would be set to {}", url);
        Ok(())
    }

    async fn delete_webhook(&self) -> Result<(), BotError> {
        tracing::info!("Console mode: webhook would be deleted");
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
