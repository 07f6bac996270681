//! Telegram adapter

pub mod types;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::domain::entities::{ChatId, MessageId, ReplyKeyboard};
use crate::domain::traits::{Bot, BotInfo, SendOptions, SentMessage};
use self::types::ApiResponse;

pub use self::types::Update;

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

#[derive(Serialize)]
struct ReplyKeyboardMarkup {
    keyboard: Vec<Vec<KeyboardButton>>,
    resize_keyboard: bool,
    one_time_keyboard: bool,
    is_persistent: bool,
}

#[derive(Serialize)]
struct KeyboardButton {
    text: String,
}

impl From<&ReplyKeyboard> for ReplyKeyboardMarkup {
    fn from(keyboard: &ReplyKeyboard) -> Self {
        Self {
            keyboard: keyboard
                .rows
                .iter()
                .map(|row| row.iter().map(|b| KeyboardButton { text: b.text.clone() }).collect())
                .collect(),
            resize_keyboard: keyboard.resize,
            one_time_keyboard: false,
            is_persistent: keyboard.persistent,
        }
    }
}

#[derive(Serialize)]
struct ReplyParameters {
    message_id: MessageId,
    allow_sending_without_reply: bool,
}

#[derive(Serialize)]
struct LinkPreviewOptions {
    is_disabled: bool,
}

/// Fields shared by every send method
#[derive(Serialize)]
struct SendRequest<'a> {
    chat_id: ChatId,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sticker: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    animation: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<ReplyKeyboardMarkup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_parameters: Option<ReplyParameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    link_preview_options: Option<LinkPreviewOptions>,
}

impl<'a> SendRequest<'a> {
    fn new(chat_id: ChatId, options: &SendOptions) -> Self {
        Self {
            chat_id,
            text: None,
            caption: None,
            sticker: None,
            animation: None,
            photo: None,
            video: None,
            voice: None,
            parse_mode: options.parse_mode.map(|m| m.as_str()),
            reply_markup: options.keyboard.as_ref().map(Into::into),
            reply_parameters: options.reply_to.map(|message_id| ReplyParameters {
                message_id,
                allow_sending_without_reply: true,
            }),
            link_preview_options: None,
        }
    }
}

#[derive(Deserialize)]
struct MessageResult {
    message_id: MessageId,
    chat: types::Chat,
}

impl From<MessageResult> for SentMessage {
    fn from(result: MessageResult) -> Self {
        SentMessage {
            chat_id: result.chat.id,
            message_id: result.message_id,
        }
    }
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, info: BotInfo) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info,
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// Call a Bot API method and unwrap its response envelope
    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, BotError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.client
            .post(self.api_url(method))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let data: ApiResponse<R> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(format!("{} returned {}: {}", method, status, e)))?;

        if !data.ok {
            return Err(BotError::Api {
                code: data.error_code,
                description: data.description.unwrap_or_else(|| status.to_string()),
            });
        }

        data.result
            .ok_or_else(|| BotError::Parse(format!("{} returned no result", method)))
    }

    async fn send(&self, method: &str, request: SendRequest<'_>) -> Result<SentMessage, BotError> {
        let chat_id = request.chat_id;
        let result: MessageResult = self.call(method, &request).await?;
        tracing::debug!("{} to {} -> message {}", method, chat_id, result.message_id);
        Ok(result.into())
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: Option<String>,
        }

        #[derive(Serialize)]
        struct Empty {}

        let data: BotInfoResponse = self.call("getMe", &Empty {}).await?;

        self.info = BotInfo {
            id: data.id,
            name: data.first_name,
            username: data.username,
        };

        Ok(())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn send_text(&self, chat_id: ChatId, text: &str, options: &SendOptions) -> Result<SentMessage, BotError> {
        let mut request = SendRequest::new(chat_id, options);
        request.text = Some(text);
        if options.disable_link_preview {
            request.link_preview_options = Some(LinkPreviewOptions { is_disabled: true });
        }
        self.send("sendMessage", request).await
    }

    async fn send_sticker(&self, chat_id: ChatId, file_id: &str, options: &SendOptions) -> Result<SentMessage, BotError> {
        let mut request = SendRequest::new(chat_id, options);
        request.sticker = Some(file_id);
        self.send("sendSticker", request).await
    }

    async fn send_animation(&self, chat_id: ChatId, file_id: &str, caption: Option<&str>, options: &SendOptions) -> Result<SentMessage, BotError> {
        let mut request = SendRequest::new(chat_id, options);
        request.animation = Some(file_id);
        request.caption = caption;
        self.send("sendAnimation", request).await
    }

    async fn send_photo(&self, chat_id: ChatId, file_id: &str, caption: Option<&str>, options: &SendOptions) -> Result<SentMessage, BotError> {
        let mut request = SendRequest::new(chat_id, options);
        request.photo = Some(file_id);
        request.caption = caption;
        self.send("sendPhoto", request).await
    }

    async fn send_video(&self, chat_id: ChatId, file_id: &str, caption: Option<&str>, options: &SendOptions) -> Result<SentMessage, BotError> {
        let mut request = SendRequest::new(chat_id, options);
        request.video = Some(file_id);
        request.caption = caption;
        self.send("sendVideo", request).await
    }

    async fn send_voice(&self, chat_id: ChatId, file_id: &str, options: &SendOptions) -> Result<SentMessage, BotError> {
        let mut request = SendRequest::new(chat_id, options);
        request.voice = Some(file_id);
        self.send("sendVoice", request).await
    }

    async fn set_webhook(&self, url: &str, drop_pending_updates: bool) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SetWebhookRequest<'a> {
            url: &'a str,
            drop_pending_updates: bool,
            allowed_updates: Vec<&'static str>,
        }

        let request = SetWebhookRequest {
            url,
            drop_pending_updates,
            allowed_updates: vec!["message"],
        };
        let _: bool = self.call("setWebhook", &request).await?;
        Ok(())
    }

    async fn delete_webhook(&self) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct DeleteWebhookRequest {
            drop_pending_updates: bool,
        }

        let _: bool = self.call("deleteWebhook", &DeleteWebhookRequest { drop_pending_updates: false }).await?;
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
