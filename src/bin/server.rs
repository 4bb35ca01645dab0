//! restaurant-kv server binary

use clap::{Parser, Subcommand, ValueEnum};
use restaurant_kv::common::{AppConfig, StoreBackend};
use restaurant_kv::Server;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "restaurant-kv")]
#[command(about = "Restaurant and review API backed by a key-value store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    Memory,
    Redis,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// TOML config file (defaults to ./restaurant-kv.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Bind address for HTTP
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Port to listen on, keeping the configured host
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Store backend
        #[arg(long, value_enum)]
        backend: Option<Backend>,

        /// Redis URL
        #[arg(long, env = "REDIS_URL")]
        redis_url: Option<String>,

        /// OpenWeatherMap API key
        #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true)]
        weather_api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            bind,
            port,
            backend,
            redis_url,
            weather_api_key,
        } => {
            // Load config from file and environment, then apply CLI overrides
            let mut conf = AppConfig::load(config.as_deref())?;
            if let Some(bind) = bind {
                conf.server.bind_addr = bind;
            }
            if let Some(port) = port {
                conf.server.bind_addr.set_port(port);
            }
            if let Some(backend) = backend {
                conf.store.backend = match backend {
                    Backend::Memory => StoreBackend::Memory,
                    Backend::Redis => StoreBackend::Redis,
                };
            }
            if let Some(url) = redis_url {
                conf.store.url = url;
            }
            if weather_api_key.is_some() {
                conf.weather.api_key = weather_api_key;
            }

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| conf.log_level.clone().into()),
                )
                .with(tracing_subscriber::fmt::layer())
                .init();

            Server::new(conf).serve().await?;
        }
    }

    Ok(())
}
