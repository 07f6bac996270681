//! Admin relay bot
//!
//! A Telegram bot that relays private user messages into an admin group and
//! routes the admins' replies back to the right user.

pub mod application;
pub mod domain;
pub mod infrastructure;
