//! Telegram Bot API wire types and their conversion to domain messages

use serde::{Deserialize, Serialize};

use crate::domain::entities::{self, Chat as DomainChat, ChatKind, Content, ReplyRef};

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub sticker: Option<FileRef>,
    pub animation: Option<FileRef>,
    pub photo: Option<Vec<FileRef>>,
    pub video: Option<FileRef>,
    pub voice: Option<FileRef>,
    pub document: Option<FileRef>,
    pub audio: Option<FileRef>,
    pub video_note: Option<FileRef>,
    pub location: Option<serde_json::Value>,
    pub contact: Option<serde_json::Value>,
    pub poll: Option<serde_json::Value>,
    pub reply_to_message: Option<Box<Message>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Any file-backed attachment; only the id is needed to resend it
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileRef {
    pub file_id: String,
}

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

impl Message {
    /// Content kind, first match wins in the order Telegram clients render them
    fn content(&self) -> Content {
        let caption = self.caption.clone();

        if let Some(text) = &self.text {
            return Content::Text(text.clone());
        }
        if let Some(sticker) = &self.sticker {
            return Content::Sticker { file_id: sticker.file_id.clone() };
        }
        // Animations also carry a `document`, so they are checked first
        if let Some(animation) = &self.animation {
            return Content::Animation { file_id: animation.file_id.clone(), caption };
        }
        // Sizes are ascending; the last is the largest
        if let Some(photo) = self.photo.as_ref().and_then(|sizes| sizes.last()) {
            return Content::Photo { file_id: photo.file_id.clone(), caption };
        }
        if let Some(video) = &self.video {
            return Content::Video { file_id: video.file_id.clone(), caption };
        }
        if let Some(voice) = &self.voice {
            return Content::Voice { file_id: voice.file_id.clone() };
        }

        let kind = if self.document.is_some() {
            "document"
        } else if self.audio.is_some() {
            "audio"
        } else if self.video_note.is_some() {
            "video_note"
        } else if self.location.is_some() {
            "location"
        } else if self.contact.is_some() {
            "contact"
        } else if self.poll.is_some() {
            "poll"
        } else {
            "unknown"
        };
        Content::Unsupported(kind.to_string())
    }
}

impl From<User> for entities::User {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            is_bot: user.is_bot,
        }
    }
}

impl From<Message> for entities::Message {
    fn from(message: Message) -> Self {
        let content = message.content();
        let reply_to = message.reply_to_message.as_ref().map(|r| ReplyRef {
            message_id: r.message_id,
            sender_id: r.from.as_ref().map(|u| u.id),
        });

        Self {
            id: message.message_id,
            chat: DomainChat {
                id: message.chat.id,
                kind: ChatKind::parse(&message.chat.kind),
            },
            sender: message.from.map(Into::into),
            content,
            reply_to,
        }
    }
}
