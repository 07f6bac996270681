//! Configuration management
//!
//! Values come from built-in defaults, then an optional YAML file, then the
//! environment. `validate` must pass before the bot starts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::domain::entities::{ChatId, UserId};

/// Default listening port
pub const DEFAULT_PORT: u16 = 10000;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub webhook: WebhookConfig,
    pub server: ServerConfig,
    pub relay: RelayConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub token: Option<String>,
    pub admin_group_id: Option<ChatId>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct WebhookConfig {
    /// Externally reachable base URL, e.g. https://bot.example.com
    pub base_url: Option<String>,
    pub drop_pending_updates: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Relay link retention
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RelayConfig {
    /// Keep at most this many links, oldest evicted first; unbounded if unset
    pub max_links: Option<usize>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            drop_pending_updates: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Values every running bot needs, checked once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    pub token: String,
    pub bot_id: UserId,
    pub admin_group_id: ChatId,
    pub base_url: String,
}

impl Validated {
    /// Path the platform posts updates to; the token doubles as a shared secret
    pub fn webhook_path(&self) -> String {
        format!("/webhook/{}", self.token)
    }

    pub fn webhook_url(&self) -> String {
        format!("{}{}", self.base_url, self.webhook_path())
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Defaults overlaid with the process environment
    pub fn load_env() -> Result<Self, ConfigError> {
        Self::default().with_env()
    }

    /// Overlay the process environment
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`; empty values count as unset
    pub fn with_lookup<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(token) = get("BOT_TOKEN") {
            self.bot.token = Some(token);
        }

        if let Some(id) = get("ADMIN_GROUP_ID") {
            let id = id
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("ADMIN_GROUP_ID must be an integer, got {:?}", id)))?;
            self.bot.admin_group_id = Some(id);
        }

        if let Some(url) = get("RENDER_EXTERNAL_URL").or_else(|| get("WEBHOOK_HOST")) {
            self.webhook.base_url = Some(url);
        }

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }

        if let Some(port) = get("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT must be a port number, got {:?}", port)))?;
        }

        if let Some(max) = get("RELAY_MAX_LINKS") {
            let max = max
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("RELAY_MAX_LINKS must be a number, got {:?}", max)))?;
            self.relay.max_links = Some(max);
        }

        Ok(self)
    }

    /// Check required values and derive the bot id from the token
    pub fn validate(&self) -> Result<Validated, ConfigError> {
        let token = self
            .bot
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingField("BOT_TOKEN".to_string()))?;

        let bot_id = bot_id_from_token(&token)?;

        let admin_group_id = self
            .bot
            .admin_group_id
            .ok_or_else(|| ConfigError::MissingField("ADMIN_GROUP_ID".to_string()))?;

        let base_url = self
            .webhook
            .base_url
            .as_deref()
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ConfigError::MissingField("RENDER_EXTERNAL_URL".to_string()))?;

        if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
            return Err(ConfigError::InvalidValue(format!("webhook base URL must be http(s), got {:?}", base_url)));
        }

        Ok(Validated {
            token,
            bot_id,
            admin_group_id,
            base_url,
        })
    }

    /// Address the webhook server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Bot tokens look like `<bot id>:<secret>`
pub fn bot_id_from_token(token: &str) -> Result<UserId, ConfigError> {
    token
        .split_once(':')
        .and_then(|(id, secret)| if secret.is_empty() { None } else { id.parse().ok() })
        .ok_or_else(|| ConfigError::InvalidValue("BOT_TOKEN is not of the form <id>:<secret>".to_string()))
}
