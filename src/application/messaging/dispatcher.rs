//! Message dispatcher - Routes inbound messages to handlers

use std::sync::Arc;

use crate::application::state::AppContext;
use crate::domain::entities::{ChatId, Message, MessageId, ReplyKeyboard, UserId};
use crate::domain::traits::{Bot, ParseMode, SendOptions};
use super::filters::{is_private, AdminPolicy};
use super::parser::{Action, MessageParser};
use super::relay::RelayEngine;
use super::texts;

/// Branch a dispatched message took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Outside the chats this bot serves, or a command in the wrong place
    Ignored,
    Greeted,
    StatsSent,
    /// `/stats` from a non-admin; nothing is sent back
    StatsDenied,
    InfoSent,
    ConversationOpened,
    ConversationClosed,
    RelayedToAdmins { admin_message_id: MessageId },
    RelayRejected,
    RelayFailed,
    ReplyDelivered { user_id: UserId },
    ReplyUnresolved,
    ReplyFailed { user_id: UserId },
    Nudged,
}

/// Send a notice, logging instead of failing
pub(super) async fn notify<B: Bot + ?Sized>(bot: &B, chat_id: ChatId, text: &str, options: &SendOptions) -> bool {
    match bot.send_text(chat_id, text, options).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Failed to send notice to chat {}: {}", chat_id, e);
            false
        }
    }
}

/// Message dispatcher - classifies each message and runs exactly one handler
pub struct MessageDispatcher<B: Bot> {
    bot: Arc<B>,
    ctx: Arc<AppContext>,
    parser: MessageParser,
    policy: AdminPolicy,
    relay: RelayEngine<B>,
}

impl<B: Bot> MessageDispatcher<B> {
    pub fn new(bot: Arc<B>, ctx: Arc<AppContext>, admin_chat_id: ChatId) -> Self {
        let info = bot.bot_info();
        Self {
            parser: MessageParser::new(info.username),
            policy: AdminPolicy::new(admin_chat_id, info.id),
            relay: RelayEngine::new(bot.clone(), ctx.clone(), admin_chat_id),
            bot,
            ctx,
        }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Handle one inbound message to completion
    pub async fn dispatch(&self, message: Message) -> Route {
        let action = self.parser.classify(&message);

        let route = match action {
            Action::Start if is_private(&message) => self.start(&message).await,
            Action::Stats if self.policy.can_view_stats(&message) => self.stats(&message).await,
            Action::Stats => Route::StatsDenied,
            Action::SendData if is_private(&message) => {
                let options = SendOptions::new()
                    .with_keyboard(ReplyKeyboard::main_menu())
                    .with_parse_mode(ParseMode::Html)
                    .without_link_preview();
                notify(self.bot(), message.chat.id, texts::SEND_DATA, &options).await;
                Route::InfoSent
            }
            Action::ShareNews if is_private(&message) => {
                let options = SendOptions::new()
                    .with_keyboard(ReplyKeyboard::main_menu())
                    .without_link_preview();
                notify(self.bot(), message.chat.id, texts::SHARE_NEWS, &options).await;
                Route::InfoSent
            }
            Action::ContactAdmins if is_private(&message) => self.open_conversation(&message).await,
            Action::EndConversation if is_private(&message) => self.close_conversation(&message).await,
            Action::Other => self.free_form(&message).await,
            // Commands and buttons outside private chats
            _ => Route::Ignored,
        };

        tracing::debug!("[{}] message {} -> {:?}", message.chat.id, message.id, route);
        route
    }

    async fn start(&self, message: &Message) -> Route {
        if let Some(user_id) = message.sender_id() {
            self.ctx.stats.record(user_id).await;
        }
        let options = SendOptions::new().with_keyboard(ReplyKeyboard::main_menu());
        notify(self.bot(), message.chat.id, texts::GREETING, &options).await;
        Route::Greeted
    }

    async fn stats(&self, message: &Message) -> Route {
        let report = self.ctx.stats.report().await;
        let options = SendOptions::new().with_parse_mode(ParseMode::Markdown);
        notify(self.bot(), message.chat.id, &report.render(), &options).await;
        Route::StatsSent
    }

    async fn open_conversation(&self, message: &Message) -> Route {
        let Some(user_id) = message.sender_id() else {
            return Route::Ignored;
        };
        self.ctx.conversations.set_awaiting(user_id, true).await;
        self.ctx.stats.record(user_id).await;
        tracing::info!("User {} opened a conversation with the admins", user_id);

        let options = SendOptions::new().with_keyboard(ReplyKeyboard::admin_chat());
        notify(self.bot(), message.chat.id, texts::CONVERSATION_OPENED, &options).await;
        Route::ConversationOpened
    }

    async fn close_conversation(&self, message: &Message) -> Route {
        let Some(user_id) = message.sender_id() else {
            return Route::Ignored;
        };
        self.ctx.conversations.set_awaiting(user_id, false).await;
        tracing::info!("User {} closed the conversation with the admins", user_id);

        let options = SendOptions::new().with_keyboard(ReplyKeyboard::main_menu());
        notify(self.bot(), message.chat.id, texts::CONVERSATION_CLOSED, &options).await;
        Route::ConversationClosed
    }

    /// Anything that is not a command or button: admin reply, relay or nudge
    async fn free_form(&self, message: &Message) -> Route {
        if self.policy.is_admin_reply(message) {
            return self.relay.deliver_reply(message).await;
        }

        if !is_private(message) {
            return Route::Ignored;
        }
        let Some(sender) = &message.sender else {
            return Route::Ignored;
        };

        if self.ctx.conversations.is_awaiting(sender.id).await {
            self.relay.forward_to_admins(message, sender).await
        } else {
            let options = SendOptions::new().with_keyboard(ReplyKeyboard::main_menu());
            notify(self.bot(), message.chat.id, &texts::nudge(), &options).await;
            Route::Nudged
        }
    }
}
