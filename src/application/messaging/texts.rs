//! User- and admin-facing message texts

use crate::domain::entities::{labels, User};

pub const GREETING: &str = "Hi! 👋\n\nChoose an action:";

/// Sent with HTML parse mode
pub const SEND_DATA: &str = "To publish your novels we need some information.\n\n\
<b>Please fill in 2 forms:</b>\n\
1. Novel questionnaire: https://tally.so/r/3qQZg2\n\
2. Translator card: https://tally.so/r/wAexoN\n\n\
It only takes a couple of minutes ✨";

pub const SHARE_NEWS: &str = "Here you can share any news, for example that you picked up a new \
translation or finished the current one.\n\n\
To send news, fill in the form: https://tally.so/r/wkBjBd";

pub const CONVERSATION_OPENED: &str = "💬 Admin chat mode is on!\n\
Everything you send now will be forwarded to the admins.";

pub const CONVERSATION_CLOSED: &str = "✅ The conversation with the admins is over.";

pub const UNSUPPORTED_KIND: &str = "Sorry, this kind of message can't be sent. \
Only text, a sticker or a GIF.";

pub const RELAYED: &str = "✅ Message sent to the admins!\n\
Chat mode is still on, feel free to write more.";

pub const RELAY_FAILED: &str = "❌ Something went wrong while sending your message. Please try again later.";

pub const REPLY_DELIVERED: &str = "✅ Reply sent to the user!";

pub const REPLY_FAILED: &str = "❌ Failed to send the reply.";

pub const REPLY_UNRESOLVED: &str = "❌ Reply to the forwarded message itself.";

pub const ADMIN_BANNER: &str = "💬 Reply from the admins";

pub const ADMIN_UNSUPPORTED: &str = "💬 The admins sent a reply (unsupported message type)";

pub fn nudge() -> String {
    format!("Got a question? Press «{}» 👀", labels::CONTACT_ADMINS)
}

/// Sender block heading every message relayed to the admin chat
pub fn sender_header(user: &User) -> String {
    format!("👤 User: {}\n🆔 ID: {}", user, user.id)
}

pub fn relayed_text(user: &User, text: &str) -> String {
    format!("{}\n\n📝 Message:\n{}", sender_header(user), text)
}

pub fn relayed_sticker_header(user: &User) -> String {
    format!("{}\n\n🎭 Sent a sticker:", sender_header(user))
}

pub fn relayed_animation_caption(user: &User, caption: Option<&str>) -> String {
    let mut text = format!("{}\n\n🎬 Sent a GIF", sender_header(user));
    if let Some(caption) = caption {
        text.push_str(&format!(":\n{}", caption));
    }
    text
}

/// Admin text reply as the user sees it
pub fn admin_reply_text(text: &str) -> String {
    format!("{}:\n\n{}", ADMIN_BANNER, text)
}

/// Banner sent ahead of a sticker, GIF or voice reply
pub fn admin_reply_banner() -> String {
    format!("{}:", ADMIN_BANNER)
}

/// Caption for photo and video replies
pub fn admin_reply_caption(caption: Option<&str>) -> String {
    match caption {
        Some(caption) => format!("{}:\n\n{}", ADMIN_BANNER, caption),
        None => ADMIN_BANNER.to_string(),
    }
}
