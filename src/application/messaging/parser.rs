//! Message parser - Classifies inbound messages by command or button label

use crate::domain::entities::{labels, Content, Message};

/// What an inbound message asks the bot to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `/start`
    Start,
    /// `/stats`
    Stats,
    SendData,
    ShareNews,
    ContactAdmins,
    EndConversation,
    /// Free-form content: relay candidate, admin reply or nudge
    Other,
}

/// Classifies messages into [`Action`]s
pub struct MessageParser {
    bot_username: Option<String>,
}

impl MessageParser {
    /// `bot_username` lets `/cmd@name` addressed to other bots fall through
    pub fn new(bot_username: Option<String>) -> Self {
        Self {
            bot_username: bot_username.map(|u| u.trim_start_matches('@').to_lowercase()),
        }
    }

    pub fn classify(&self, message: &Message) -> Action {
        let Content::Text(text) = &message.content else {
            return Action::Other;
        };

        if let Some(command) = self.parse_command(text) {
            return match command {
                "start" => Action::Start,
                "stats" => Action::Stats,
                _ => Action::Other,
            };
        }

        match text.as_str() {
            labels::SEND_DATA => Action::SendData,
            labels::SHARE_NEWS => Action::ShareNews,
            labels::CONTACT_ADMINS => Action::ContactAdmins,
            labels::END_CONVERSATION => Action::EndConversation,
            _ => Action::Other,
        }
    }

    /// Command name without the slash, `@mention` or arguments
    fn parse_command<'a>(&self, text: &'a str) -> Option<&'a str> {
        let rest = text.strip_prefix('/')?;
        // "/ stats ..." is prose, not a command
        if rest.starts_with(char::is_whitespace) {
            return None;
        }
        let head = rest.split_whitespace().next()?;

        let (name, mention) = match head.split_once('@') {
            Some((name, mention)) => (name, Some(mention)),
            None => (head, None),
        };

        if let (Some(mention), Some(own)) = (mention, &self.bot_username) {
            if mention.to_lowercase() != *own {
                return None;
            }
        }

        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}
