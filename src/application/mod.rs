//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Errors: Transport and configuration errors
//! - State: Conversation tables and usage counters
//! - Messaging: Message parsing, filtering, dispatching and relaying

pub mod errors;
pub mod state;
pub mod messaging;
