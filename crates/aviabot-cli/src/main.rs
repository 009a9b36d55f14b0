use aviabot_booking::{SqliteBookingStore, TemplateTicketRenderer};
use aviabot_channels::{Channel, ChannelEvent, TelegramChannel};
use aviabot_engine::Engine;
use aviabot_flights::ScheduleGenerator;
use aviabot_session::{InMemorySessionMap, SqliteStepStore};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aviabot", about = "AviaBot — conversational flight booking bot")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "aviabot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot and poll for updates
    Run {
        /// Bot token (overrides config)
        #[arg(long)]
        token: Option<String>,
    },
}

#[derive(Deserialize)]
struct AviabotConfig {
    telegram: TelegramConfig,
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
    #[serde(default = "default_carrier")]
    carrier: String,
}

#[derive(Deserialize)]
struct TelegramConfig {
    #[serde(default)]
    bot_token: String,
    #[serde(default = "default_event_buffer")]
    event_buffer: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_carrier() -> String {
    "AVIABOT-AIRLINES".to_string()
}
fn default_event_buffer() -> usize {
    64
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();

    let config_str = tokio::fs::read_to_string(&cli.config).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to read config file '{}': {}",
            cli.config.display(),
            e
        )
    })?;
    let config: AviabotConfig = toml::from_str(&config_str)?;

    match cli.command {
        Commands::Run { token } => {
            let token = token.unwrap_or(config.telegram.bot_token);
            if token.is_empty() {
                anyhow::bail!("No bot token: set telegram.bot_token in the config or pass --token");
            }

            tokio::fs::create_dir_all(&config.data_dir).await?;
            let db_path = config.data_dir.join("aviabot.db");

            let sessions = Arc::new(InMemorySessionMap::new());
            let steps = Arc::new(SqliteStepStore::open(&db_path)?);
            let bookings = Arc::new(SqliteBookingStore::open(&db_path)?);
            let renderer = Arc::new(TemplateTicketRenderer::new(
                bookings.clone(),
                config.carrier,
            ));
            let generator = Arc::new(ScheduleGenerator::new());

            let engine = Arc::new(Engine::new(
                sessions, steps, bookings, generator, renderer,
            ));

            let mut telegram = TelegramChannel::new(token, config.telegram.event_buffer);
            let mut events = telegram
                .take_event_receiver()
                .ok_or_else(|| anyhow::anyhow!("event receiver already taken"))?;
            let telegram = Arc::new(telegram);

            let poller = telegram.clone();
            tokio::spawn(async move {
                if let Err(e) = poller.poll_updates().await {
                    error!(error = %e, "update polling stopped");
                }
            });

            info!("AviaBot started");

            while let Some(ChannelEvent::MessageReceived(msg)) = events.recv().await {
                let chat_id = msg.chat_id.clone();
                match engine.handle(&msg.into_incoming()).await {
                    Ok(replies) => {
                        for reply in &replies {
                            if let Err(e) = telegram.send(&chat_id, reply).await {
                                error!(chat = %chat_id, error = %e, "failed to send reply");
                            }
                        }
                    }
                    Err(e) => {
                        error!(chat = %chat_id, error = %e, "failed to handle message");
                    }
                }
            }

            info!("event channel closed, shutting down");
        }
    }

    Ok(())
}
