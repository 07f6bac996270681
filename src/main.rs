use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;

use admin_relay_bot::application::errors::BotError;
use admin_relay_bot::application::messaging::MessageDispatcher;
use admin_relay_bot::application::state::AppContext;
use admin_relay_bot::domain::traits::{Bot, BotInfo};
use admin_relay_bot::infrastructure::adapters::{ConsoleAdapter, TelegramAdapter};
use admin_relay_bot::infrastructure::config::{Config, Validated};
use admin_relay_bot::infrastructure::server;

#[derive(Parser)]
#[command(name = "admin-relay-bot")]
#[command(about = "Relays private messages to an admin group and routes replies back", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Run {
        /// Log outbound messages instead of calling Telegram
        #[arg(long)]
        dry_run: bool,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { dry_run } => {
            if let Err(e) = run_bot(&cli.config, dry_run) {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("admin-relay-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn load_config(config_path: &str) -> Result<(Config, Validated), BotError> {
    let config = if Path::new(config_path).exists() {
        tracing::info!("Loading config from {}", config_path);
        Config::load(config_path)?.with_env()?
    } else {
        Config::load_env()?
    };

    let validated = config.validate()?;
    Ok((config, validated))
}

fn run_bot(config_path: &str, dry_run: bool) -> Result<(), BotError> {
    let (config, validated) = load_config(config_path)?;
    let ctx = Arc::new(AppContext::new(config.relay.max_links));

    tracing::info!(
        "Starting admin-relay-bot (bot {}, admin group {})",
        validated.bot_id,
        validated.admin_group_id
    );

    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        if dry_run {
            tracing::info!("Dry run: outbound messages go to stdout");
            let bot = Arc::new(ConsoleAdapter::with_info(BotInfo::new(validated.bot_id)));
            start(bot, ctx, &config, &validated).await
        } else {
            let mut bot = TelegramAdapter::new(validated.token.clone(), BotInfo::new(validated.bot_id));
            match bot.fetch_bot_info().await {
                Ok(()) => {
                    let info = bot.bot_info();
                    tracing::info!("Bot: {} (@{})", info.name, info.username.as_deref().unwrap_or("-"));
                }
                Err(e) => tracing::warn!("Failed to fetch bot info: {}", e),
            }
            start(Arc::new(bot), ctx, &config, &validated).await
        }
    })
}

async fn start<B: Bot + 'static>(
    bot: Arc<B>,
    ctx: Arc<AppContext>,
    config: &Config,
    validated: &Validated,
) -> Result<(), BotError> {
    let dispatcher = MessageDispatcher::new(bot, ctx, validated.admin_group_id);
    server::serve(config, validated, dispatcher).await
}

fn init_config() {
    match serde_yaml::to_string(&Config::default()) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => tracing::error!("Failed to render default config: {}", e),
    }
}
