use super::{User, UserId};

/// Numeric Telegram chat identifier
pub type ChatId = i64;

/// Platform-assigned message identifier, unique within a chat
pub type MessageId = i64;

/// Kind of conversation a message arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
    Other,
}

impl ChatKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "private" => ChatKind::Private,
            "group" => ChatKind::Group,
            "supergroup" => ChatKind::Supergroup,
            "channel" => ChatKind::Channel,
            _ => ChatKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub kind: ChatKind,
}

/// Message content, one variant per kind the relay knows how to move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Sticker { file_id: String },
    Animation { file_id: String, caption: Option<String> },
    Photo { file_id: String, caption: Option<String> },
    Video { file_id: String, caption: Option<String> },
    Voice { file_id: String },
    /// Anything else; carries the platform's name for the kind
    Unsupported(String),
}

impl Content {
    pub fn kind(&self) -> &str {
        match self {
            Content::Text(_) => "text",
            Content::Sticker { .. } => "sticker",
            Content::Animation { .. } => "animation",
            Content::Photo { .. } => "photo",
            Content::Video { .. } => "video",
            Content::Voice { .. } => "voice",
            Content::Unsupported(kind) => kind,
        }
    }
}

/// Reference to the message an inbound message replies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRef {
    pub message_id: MessageId,
    pub sender_id: Option<UserId>,
}

/// An inbound chat message, already stripped of transport details
#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub chat: Chat,
    pub sender: Option<User>,
    pub content: Content,
    pub reply_to: Option<ReplyRef>,
}

impl Message {
    pub fn new(id: MessageId, chat: Chat, content: Content) -> Self {
        Self {
            id,
            chat,
            sender: None,
            content,
            reply_to: None,
        }
    }

    /// Text message in a one-to-one chat with `user`
    pub fn private_text(id: MessageId, user: User, text: impl Into<String>) -> Self {
        let chat = Chat { id: user.id, kind: ChatKind::Private };
        Self::new(id, chat, Content::Text(text.into())).with_sender(user)
    }

    pub fn with_sender(mut self, user: User) -> Self {
        self.sender = Some(user);
        self
    }

    pub fn with_reply_to(mut self, reply: ReplyRef) -> Self {
        self.reply_to = Some(reply);
        self
    }

    pub fn sender_id(&self) -> Option<UserId> {
        self.sender.as_ref().map(|u| u.id)
    }
}
