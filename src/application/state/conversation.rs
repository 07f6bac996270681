//! Conversation state: who is talking to the admins, and which admin-chat
//! message belongs to which user

use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

use crate::domain::entities::{MessageId, UserId};

/// In-memory conversation tables, one lock per table
pub struct ConversationStore {
    awaiting: RwLock<HashMap<UserId, bool>>,
    links: RwLock<LinkTable>,
}

/// Admin-chat message id -> originating user.
///
/// Links are never removed when used, so any number of replies can go to the
/// same forwarded message. Without a capacity the table grows for the life of
/// the process; with one, the oldest links are evicted first.
struct LinkTable {
    by_message: HashMap<MessageId, UserId>,
    order: VecDeque<MessageId>,
    capacity: Option<usize>,
}

impl LinkTable {
    fn insert(&mut self, admin_message_id: MessageId, user_id: UserId) {
        let fresh = self.by_message.insert(admin_message_id, user_id).is_none();

        // Insertion order is only needed to evict
        if let Some(capacity) = self.capacity {
            if fresh {
                self.order.push_back(admin_message_id);
            }
            while self.by_message.len() > capacity {
                let Some(oldest) = self.order.pop_front() else { break };
                self.by_message.remove(&oldest);
                tracing::debug!("Evicted relay link for admin message {}", oldest);
            }
        }
    }
}

impl ConversationStore {
    /// Store with an unbounded link table
    pub fn new() -> Self {
        Self::with_link_capacity(None)
    }

    pub fn with_link_capacity(capacity: Option<usize>) -> Self {
        Self {
            awaiting: RwLock::new(HashMap::new()),
            links: RwLock::new(LinkTable {
                by_message: HashMap::new(),
                order: VecDeque::new(),
                capacity: capacity.filter(|c| *c > 0),
            }),
        }
    }

    /// Set or clear the awaiting-admin-reply flag
    pub async fn set_awaiting(&self, user_id: UserId, flag: bool) {
        self.awaiting.write().await.insert(user_id, flag);
    }

    /// Awaiting-admin-reply flag, false for unseen users
    pub async fn is_awaiting(&self, user_id: UserId) -> bool {
        self.awaiting.read().await.get(&user_id).copied().unwrap_or(false)
    }

    /// Record that `admin_message_id` in the admin chat was relayed from `user_id`
    pub async fn link_admin_message(&self, admin_message_id: MessageId, user_id: UserId) {
        self.links.write().await.insert(admin_message_id, user_id);
    }

    /// User a forwarded admin-chat message came from
    pub async fn resolve_user(&self, admin_message_id: MessageId) -> Option<UserId> {
        self.links.read().await.by_message.get(&admin_message_id).copied()
    }

    pub async fn link_count(&self) -> usize {
        self.links.read().await.by_message.len()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}
