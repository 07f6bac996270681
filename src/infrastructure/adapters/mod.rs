//! Platform adapters implementing the `Bot` trait

pub mod console;
pub mod telegram;

pub use console::{ConsoleAdapter, Transcript};
pub use telegram::TelegramAdapter;
