//! Webhook server
//!
//! Telegram posts updates to `/webhook/{token}`. Every other path only
//! answers liveness probes.

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;
use crate::domain::traits::Bot;
use crate::infrastructure::adapters::telegram::Update;
use crate::infrastructure::config::{Config, Validated};

/// Body returned by the liveness endpoints
pub const ALIVE: &str = "Bot is running!";

/// Shared state of the webhook handlers
pub struct ServerState<B: Bot> {
    pub dispatcher: MessageDispatcher<B>,
    webhook_token: String,
}

impl<B: Bot> ServerState<B> {
    pub fn new(dispatcher: MessageDispatcher<B>, webhook_token: impl Into<String>) -> Self {
        Self {
            dispatcher,
            webhook_token: webhook_token.into(),
        }
    }
}

/// Build the HTTP routes
pub fn router<B: Bot + 'static>(state: Arc<ServerState<B>>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/webhook/{token}", post(webhook::<B>))
        .with_state(state)
}

async fn health() -> &'static str {
    ALIVE
}

async fn webhook<B: Bot + 'static>(
    State(state): State<Arc<ServerState<B>>>,
    Path(token): Path<String>,
    body: Bytes,
) -> StatusCode {
    if token != state.webhook_token {
        tracing::warn!("Webhook call with an unknown token");
        return StatusCode::NOT_FOUND;
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            // Acknowledge anyway so Telegram does not redeliver it forever
            tracing::warn!("Malformed update ({} bytes): {}", body.len(), e);
            return StatusCode::OK;
        }
    };

    match update.message {
        Some(message) => {
            let route = state.dispatcher.dispatch(message.into()).await;
            tracing::debug!("Update {} handled: {:?}", update.update_id, route);
        }
        None => tracing::debug!("Update {} has no message, skipping", update.update_id),
    }

    StatusCode::OK
}

/// Register the webhook, serve until Ctrl-C or SIGTERM, then unregister
pub async fn serve<B: Bot + 'static>(
    config: &Config,
    validated: &Validated,
    dispatcher: MessageDispatcher<B>,
) -> Result<(), BotError> {
    let state = Arc::new(ServerState::new(dispatcher, validated.token.clone()));

    // Only point Telegram at us once the port is ours
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    match state
        .dispatcher
        .bot()
        .set_webhook(&validated.webhook_url(), config.webhook.drop_pending_updates)
        .await
    {
        Ok(()) => tracing::info!("Webhook registered at {}/webhook/<token>", validated.base_url),
        Err(e) => tracing::error!("Failed to register webhook: {}", e),
    }

    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down");
    if let Err(e) = state.dispatcher.bot().delete_webhook().await {
        tracing::warn!("Failed to delete webhook: {}", e);
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::application::state::AppContext;
    use crate::domain::entities::ChatId;
    use crate::domain::traits::{BotInfo, SendOptions, SentMessage};

    /// Counts webhook registrations; sends are never expected
    #[derive(Default)]
    struct WebhookCounter {
        registered: AtomicUsize,
    }

    #[async_trait]
    impl Bot for WebhookCounter {
        async fn send_text(&self, chat_id: ChatId, _body: &str, _options: &SendOptions) -> Result<SentMessage, BotError> {
            Ok(SentMessage { chat_id, message_id: 1 })
        }

        async fn send_sticker(&self, chat_id: ChatId, _body: &str, _options: &SendOptions) -> Result<SentMessage, BotError> {
            Ok(SentMessage { chat_id, message_id: 1 })
        }

        async fn send_animation(&self, chat_id: ChatId, _body: &str, _caption: Option<&str>, _options: &SendOptions) -> Result<SentMessage, BotError> {
            Ok(SentMessage { chat_id, message_id: 1 })
        }

        async fn send_photo(&self, chat_id: ChatId, _body: &str, _caption: Option<&str>, _options: &SendOptions) -> Result<SentMessage, BotError> {
            Ok(SentMessage { chat_id, message_id: 1 })
        }

        async fn send_video(&self, chat_id: ChatId, _body: &str, _caption: Option<&str>, _options: &SendOptions) -> Result<SentMessage, BotError> {
            Ok(SentMessage { chat_id, message_id: 1 })
        }

        async fn send_voice(&self, chat_id: ChatId, _body: &str, _options: &SendOptions) -> Result<SentMessage, BotError> {
            Ok(SentMessage { chat_id, message_id: 1 })
        }

        async fn set_webhook(&self, _url: &str, _drop_pending_updates: bool) -> Result<(), BotError> {
            self.registered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn delete_webhook(&self) -> Result<(), BotError> {
            Ok(())
        }

        fn bot_info(&self) -> BotInfo {
            BotInfo::new(9000)
        }
    }

    #[tokio::test]
    async fn webhook_not_registered_when_port_is_taken() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = port;
        let validated = Validated {
            token: "9000:secret".to_string(),
            bot_id: 9000,
            admin_group_id: -100,
            base_url: "https://relay.example.com".to_string(),
        };

        let bot = Arc::new(WebhookCounter::default());
        let dispatcher = MessageDispatcher::new(bot.clone(), Arc::new(AppContext::default()), -100);

        let result = serve(&config, &validated, dispatcher).await;
        assert!(matches!(result, Err(BotError::Io(_))));
        assert_eq!(bot.registered.load(Ordering::SeqCst), 0);
    }
}
