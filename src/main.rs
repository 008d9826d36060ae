/// API сервер модели расхода топлива

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fuel_ml::{config::ServerConfig, server, PredictionService};

#[derive(Parser, Debug)]
#[command(name = "fuel-ml", version, about = "Fuel consumption prediction API")]
struct Args {
    /// Адрес для входящих соединений
    #[arg(long, env = "FUEL_BIND_ADDR", default_value_t = ServerConfig::default().bind)]
    bind: SocketAddr,

    /// Путь к артефакту модели
    #[arg(long, env = "FUEL_MODEL_PATH", default_value_os_t = ServerConfig::default().artifact)]
    artifact: PathBuf,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            bind: args.bind,
            artifact: args.artifact,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from(Args::parse());

    // Модель загружается один раз; без нее сервер не стартует
    let service = PredictionService::load(&config.artifact)
        .with_context(|| format!("failed to load model from {}", config.artifact.display()))?;

    let app = server::router(service);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!("Server listening on http://{}", config.bind);
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
