//! Filter predicates applied at the dispatch entry point

use crate::domain::entities::{ChatId, ChatKind, Message, UserId};

/// Only one-to-one chats reach the user-facing handlers
pub fn is_private(message: &Message) -> bool {
    message.chat.kind == ChatKind::Private && message.sender.is_some()
}

/// Who counts as an admin, and which messages are admin replies
#[derive(Debug, Clone, Copy)]
pub struct AdminPolicy {
    pub admin_chat_id: ChatId,
    pub bot_id: UserId,
}

impl AdminPolicy {
    pub fn new(admin_chat_id: ChatId, bot_id: UserId) -> Self {
        Self { admin_chat_id, bot_id }
    }

    pub fn is_admin_chat(&self, message: &Message) -> bool {
        message.chat.id == self.admin_chat_id
    }

    /// Admin-chat message replying to something the bot posted
    pub fn is_admin_reply(&self, message: &Message) -> bool {
        self.is_admin_chat(message)
            && message
                .reply_to
                .as_ref()
                .is_some_and(|r| r.sender_id == Some(self.bot_id))
    }

    /// `/stats` is allowed from the admin chat itself, or privately from the
    /// user whose id is the admin id without its leading `-`
    pub fn can_view_stats(&self, message: &Message) -> bool {
        if self.is_admin_chat(message) {
            return true;
        }
        let normalized = self.admin_chat_id.unsigned_abs();
        message
            .sender_id()
            .is_some_and(|id| id >= 0 && id.unsigned_abs() == normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Chat, Content, ReplyRef, User};

    const ADMIN_CHAT: ChatId = -100_555;
    const BOT: UserId = 9_000;

    fn policy() -> AdminPolicy {
        AdminPolicy::new(ADMIN_CHAT, BOT)
    }

    fn in_admin_chat(reply_sender: Option<UserId>) -> Message {
        let chat = Chat { id: ADMIN_CHAT, kind: ChatKind::Supergroup };
        let msg = Message::new(10, chat, Content::Text("hi".into())).with_sender(User::new(1, "Admin"));
        match reply_sender {
            Some(sender) => msg.with_reply_to(ReplyRef { message_id: 5, sender_id: Some(sender) }),
            None => msg,
        }
    }

    #[test]
    fn private_requires_sender() {
        let msg = Message::private_text(1, User::new(2, "Ada"), "x");
        assert!(is_private(&msg));

        let mut anonymous = msg.clone();
        anonymous.sender = None;
        assert!(!is_private(&anonymous));
        assert!(!is_private(&in_admin_chat(None)));
    }

    #[test]
    fn admin_reply_needs_bot_authored_target() {
        assert!(policy().is_admin_reply(&in_admin_chat(Some(BOT))));
        assert!(!policy().is_admin_reply(&in_admin_chat(Some(1234))));
        assert!(!policy().is_admin_reply(&in_admin_chat(None)));
    }

    #[test]
    fn reply_outside_admin_chat_is_not_admin_reply() {
        let msg = Message::private_text(1, User::new(2, "Ada"), "x")
            .with_reply_to(ReplyRef { message_id: 5, sender_id: Some(BOT) });
        assert!(!policy().is_admin_reply(&msg));
    }

    #[test]
    fn stats_access() {
        assert!(policy().can_view_stats(&in_admin_chat(None)));

        let admin_user = Message::private_text(1, User::new(100_555, "Owner"), "/stats");
        assert!(policy().can_view_stats(&admin_user));

        let stranger = Message::private_text(1, User::new(77, "Eve"), "/stats");
        assert!(!policy().can_view_stats(&stranger));
    }

    #[test]
    fn positive_admin_id_matches_directly() {
        let policy = AdminPolicy::new(31337, BOT);
        let owner = Message::private_text(1, User::new(31337, "Owner"), "/stats");
        assert!(policy.can_view_stats(&owner));
    }
}
