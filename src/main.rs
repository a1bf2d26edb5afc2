// src/main.rs

use std::process::ExitCode;
use std::sync::Arc;

use berita_acara::config::Config;
use berita_acara::gateway::{Gateway, HttpGateway};
use berita_acara::kiosk::Kiosk;
use berita_acara::state::AppState;
use dotenvy::dotenv;
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file (if present)
    dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "berita-acara.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let gateway: Arc<dyn Gateway> = match HttpGateway::new(&config) {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Loading initial data from {}", config.api_base_url);
    let state = match AppState::bootstrap(gateway.as_ref()).await {
        Ok(state) => state,
        Err(e) => {
            eprintln!(
                "Failed to load data from the backend ({}). Make sure the server at {} is running.",
                e.user_message(),
                config.api_base_url
            );
            return ExitCode::FAILURE;
        }
    };

    let kiosk = Kiosk::new(state, gateway, std::io::stdout());
    match kiosk.run(BufReader::new(tokio::io::stdin())).await {
        Ok(_) => {
            tracing::info!("Kiosk closed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Kiosk stopped: {:?}", e);
            ExitCode::FAILURE
        }
    }
}
