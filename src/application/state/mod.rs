//! Process-lifetime state shared by every handler

pub mod conversation;
pub mod stats;

pub use conversation::ConversationStore;
pub use stats::{DayCount, StatsReport, StatsTracker};

/// Tables the dispatcher reads and mutates. Built once at startup and shared
/// through an `Arc`; each table carries its own lock.
#[derive(Default)]
pub struct AppContext {
    pub conversations: ConversationStore,
    pub stats: StatsTracker,
}

impl AppContext {
    pub fn new(max_links: Option<usize>) -> Self {
        Self {
            conversations: ConversationStore::with_link_capacity(max_links),
            stats: StatsTracker::new(),
        }
    }
}
