//! bigbrother: host health web service.
//!
//! This is the application entry point. It parses command line arguments,
//! loads configuration from TOML, initializes tracing, builds the router
//! around the sysinfo metrics source and starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bigbrother::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use bigbrother::{create_router, http::start_server, AppState, SysinfoSource};

/// bigbrother: reports host CPU, memory and disk health over HTTP
#[derive(Parser, Debug)]
#[command(name = "bigbrother", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "bigbrother=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override http.host from the configuration file
    #[arg(long)]
    host: Option<String>,

    /// Override http.port from the configuration file
    #[arg(long)]
    port: Option<u16>,
}

fn init_tracing(log_filter: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::new(log_filter);
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // An explicit --config must exist; the default path is optional
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_or_default(DEFAULT_CONFIG_PATH)?,
    };
    if let Some(host) = args.host {
        config.http.host = host;
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, config.logging.is_json());

    tracing::info!(
        config = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH),
        cpu_sample_interval_ms = config.health.cpu_sample_interval_ms,
        disk_mount_point = %config.health.disk_mount_point,
        sample_timeout_ms = config.health.sample_timeout_ms,
        "Loaded configuration"
    );

    let metrics = SysinfoSource::from_config(&config.health);
    let state = AppState::new(config.clone(), metrics);
    let app = create_router(state);

    start_server(app, &config).await?;

    tracing::info!("Shut down cleanly");
    Ok(())
}
