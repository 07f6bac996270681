use async_trait::async_trait;
use crate::domain::entities::{ChatId, MessageId, ReplyKeyboard, UserId};
use crate::application::errors::BotError;

/// Bot trait - abstraction for the messaging platform transport
///
/// Every send returns the descriptor of the message the platform created,
/// or fails. Callers decide what a failure means to the user.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Send a text message
    async fn send_text(&self, chat_id: ChatId, text: &str, options: &SendOptions) -> Result<SentMessage, BotError>;

    /// Send a sticker by file id
    async fn send_sticker(&self, chat_id: ChatId, file_id: &str, options: &SendOptions) -> Result<SentMessage, BotError>;

    /// Send an animation (GIF) by file id
    async fn send_animation(&self, chat_id: ChatId, file_id: &str, caption: Option<&str>, options: &SendOptions) -> Result<SentMessage, BotError>;

    /// Send a photo by file id
    async fn send_photo(&self, chat_id: ChatId, file_id: &str, caption: Option<&str>, options: &SendOptions) -> Result<SentMessage, BotError>;

    /// Send a video by file id
    async fn send_video(&self, chat_id: ChatId, file_id: &str, caption: Option<&str>, options: &SendOptions) -> Result<SentMessage, BotError>;

    /// Send a voice note by file id
    async fn send_voice(&self, chat_id: ChatId, file_id: &str, options: &SendOptions) -> Result<SentMessage, BotError>;

    /// Point the platform's event delivery at `url`
    async fn set_webhook(&self, url: &str, drop_pending_updates: bool) -> Result<(), BotError>;

    /// Stop webhook delivery
    async fn delete_webhook(&self) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Descriptor of a message the platform accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Text formatting understood by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Html,
    Markdown,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
            ParseMode::Markdown => "Markdown",
        }
    }
}

/// Optional parameters shared by every send
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub keyboard: Option<ReplyKeyboard>,
    pub reply_to: Option<MessageId>,
    pub parse_mode: Option<ParseMode>,
    pub disable_link_preview: bool,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyboard(mut self, keyboard: ReplyKeyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn reply_to(mut self, message_id: MessageId) -> Self {
        self.reply_to = Some(message_id);
        self
    }

    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    pub fn without_link_preview(mut self) -> Self {
        self.disable_link_preview = true;
        self
    }
}

/// Bot information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotInfo {
    pub id: UserId,
    pub name: String,
    pub username: Option<String>,
}

impl BotInfo {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            name: "admin-relay-bot".to_string(),
            username: None,
        }
    }
}
