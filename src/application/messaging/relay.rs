//! Relay engine - moves messages between users and the admin chat

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::state::AppContext;
use crate::domain::entities::{ChatId, Content, Message, ReplyKeyboard, User, UserId};
use crate::domain::traits::{Bot, SendOptions, SentMessage};
use super::dispatcher::{notify, Route};
use super::texts;

/// Forwards user messages into the admin chat and routes admin replies back
pub struct RelayEngine<B: Bot> {
    bot: Arc<B>,
    ctx: Arc<AppContext>,
    admin_chat_id: ChatId,
}

impl<B: Bot> RelayEngine<B> {
    pub fn new(bot: Arc<B>, ctx: Arc<AppContext>, admin_chat_id: ChatId) -> Self {
        Self { bot, ctx, admin_chat_id }
    }

    /// User -> admin chat. The caller checks that `sender` is awaiting a reply.
    ///
    /// The awaiting state is left alone whatever happens here.
    pub async fn forward_to_admins(&self, message: &Message, sender: &User) -> Route {
        let user_chat = message.chat.id;
        let keep_chatting = SendOptions::new().with_keyboard(ReplyKeyboard::admin_chat());

        let sent = match &message.content {
            Content::Text(text) => {
                let body = texts::relayed_text(sender, text);
                self.bot.send_text(self.admin_chat_id, &body, &SendOptions::new()).await
            }
            Content::Sticker { file_id } => self.forward_sticker(sender, file_id).await,
            Content::Animation { file_id, caption } => {
                let caption = texts::relayed_animation_caption(sender, caption.as_deref());
                self.bot
                    .send_animation(self.admin_chat_id, file_id, Some(&caption), &SendOptions::new())
                    .await
            }
            Content::Photo { .. } | Content::Video { .. } | Content::Voice { .. } | Content::Unsupported(_) => {
                tracing::info!("Rejected {} from user {}", message.content.kind(), sender.id);
                notify(self.bot.as_ref(), user_chat, texts::UNSUPPORTED_KIND, &keep_chatting).await;
                return Route::RelayRejected;
            }
        };

        match sent {
            Ok(sent) => {
                self.ctx.conversations.link_admin_message(sent.message_id, sender.id).await;
                tracing::info!("Relayed {} from user {} as admin message {}", message.content.kind(), sender.id, sent.message_id);

                notify(self.bot.as_ref(), user_chat, texts::RELAYED, &keep_chatting).await;
                Route::RelayedToAdmins { admin_message_id: sent.message_id }
            }
            Err(e) => {
                tracing::error!("Failed to relay message from user {} to admins: {}", sender.id, e);
                notify(self.bot.as_ref(), user_chat, texts::RELAY_FAILED, &keep_chatting).await;
                Route::RelayFailed
            }
        }
    }

    /// Header text, then the sticker itself. Only the sticker is linked, so
    /// admins reply to the sticker.
    async fn forward_sticker(&self, sender: &User, file_id: &str) -> Result<SentMessage, BotError> {
        let header = texts::relayed_sticker_header(sender);
        self.bot.send_text(self.admin_chat_id, &header, &SendOptions::new()).await?;
        self.bot.send_sticker(self.admin_chat_id, file_id, &SendOptions::new()).await
    }

    /// Admin chat -> user. The caller checks that `message` is an admin reply
    /// to a bot-authored message.
    ///
    /// The link stays in place afterwards so the thread can be answered again.
    pub async fn deliver_reply(&self, message: &Message) -> Route {
        let Some(reply) = &message.reply_to else {
            return Route::Ignored;
        };
        let to_admin = SendOptions::new().reply_to(message.id);

        let Some(user_id) = self.ctx.conversations.resolve_user(reply.message_id).await else {
            tracing::info!("Admin replied to message {} which is not linked to a user", reply.message_id);
            notify(self.bot.as_ref(), message.chat.id, texts::REPLY_UNRESOLVED, &to_admin).await;
            return Route::ReplyUnresolved;
        };

        let awaiting = self.ctx.conversations.is_awaiting(user_id).await;
        let keyboard = ReplyKeyboard::for_state(awaiting);

        match self.send_reply(user_id, &message.content, keyboard).await {
            Ok(()) => {
                tracing::info!("Delivered admin {} reply to user {}", message.content.kind(), user_id);
                notify(self.bot.as_ref(), message.chat.id, texts::REPLY_DELIVERED, &to_admin).await;
                Route::ReplyDelivered { user_id }
            }
            Err(e) => {
                tracing::error!("Failed to deliver admin reply to user {}: {}", user_id, e);
                notify(self.bot.as_ref(), message.chat.id, texts::REPLY_FAILED, &to_admin).await;
                Route::ReplyFailed { user_id }
            }
        }
    }

    async fn send_reply(&self, user_id: UserId, content: &Content, keyboard: ReplyKeyboard) -> Result<(), BotError> {
        let bot = self.bot.as_ref();
        let with_keyboard = SendOptions::new().with_keyboard(keyboard);
        let plain = SendOptions::new();

        match content {
            Content::Text(text) => {
                bot.send_text(user_id, &texts::admin_reply_text(text), &with_keyboard).await?;
            }
            Content::Sticker { file_id } => {
                bot.send_text(user_id, &texts::admin_reply_banner(), &with_keyboard).await?;
                bot.send_sticker(user_id, file_id, &plain).await?;
            }
            Content::Animation { file_id, caption } => {
                bot.send_text(user_id, &texts::admin_reply_banner(), &with_keyboard).await?;
                bot.send_animation(user_id, file_id, caption.as_deref(), &plain).await?;
            }
            Content::Photo { file_id, caption } => {
                let caption = texts::admin_reply_caption(caption.as_deref());
                bot.send_photo(user_id, file_id, Some(&caption), &with_keyboard).await?;
            }
            Content::Video { file_id, caption } => {
                let caption = texts::admin_reply_caption(caption.as_deref());
                bot.send_video(user_id, file_id, Some(&caption), &with_keyboard).await?;
            }
            Content::Voice { file_id } => {
                bot.send_text(user_id, &texts::admin_reply_banner(), &with_keyboard).await?;
                bot.send_voice(user_id, file_id, &plain).await?;
            }
            Content::Unsupported(kind) => {
                tracing::debug!("Admin replied with unsupported {}", kind);
                bot.send_text(user_id, texts::ADMIN_UNSUPPORTED, &with_keyboard).await?;
            }
        }
        Ok(())
    }
}
