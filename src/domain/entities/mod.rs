//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod message;
pub mod keyboard;

pub use user::{User, UserId};
pub use message::{Chat, ChatId, ChatKind, Content, Message, MessageId, ReplyRef};
pub use keyboard::{labels, KeyboardButton, ReplyKeyboard};
