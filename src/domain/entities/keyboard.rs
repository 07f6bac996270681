//! Reply keyboards shown under the message input

/// Button labels; inbound button presses arrive as plain text equal to these
pub mod labels {
    pub const SEND_DATA: &str = "📤 Send data";
    pub const SHARE_NEWS: &str = "📰 Share news";
    pub const CONTACT_ADMINS: &str = "✍️ Message the admins";
    pub const END_CONVERSATION: &str = "❌ End conversation";
}

/// Keyboard button; pressing it sends its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub text: String,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Persistent reply keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyKeyboard {
    pub rows: Vec<Vec<KeyboardButton>>,
    pub resize: bool,
    pub persistent: bool,
}

impl ReplyKeyboard {
    /// One button per row
    pub fn column(labels: &[&str]) -> Self {
        Self {
            rows: labels.iter().map(|l| vec![KeyboardButton::new(*l)]).collect(),
            resize: true,
            persistent: true,
        }
    }

    /// Keyboard for users not talking to the admins
    pub fn main_menu() -> Self {
        Self::column(&[labels::SEND_DATA, labels::SHARE_NEWS, labels::CONTACT_ADMINS])
    }

    /// Keyboard while a conversation with the admins is open
    pub fn admin_chat() -> Self {
        Self::column(&[labels::END_CONVERSATION])
    }

    /// Keyboard matching a user's conversation state
    pub fn for_state(awaiting_admin_reply: bool) -> Self {
        if awaiting_admin_reply {
            Self::admin_chat()
        } else {
            Self::main_menu()
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(|b| b.text.as_str())
    }
}
