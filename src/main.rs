use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod clipboard;
mod config;
mod error;
mod handlers;
mod routes;
mod tree;

use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<Config>,
}

#[derive(Parser, Debug)]
#[command(name = "treeclip")]
#[command(about = "Local file tree server with clipboard copy")]
#[command(version)]
struct Cli {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "TREECLIP_PORT")]
    port: Option<u16>,

    /// Address to bind to (overrides the config file)
    #[arg(short, long, env = "TREECLIP_BIND")]
    bind: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, env = "TREECLIP_VERBOSE")]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long, env = "TREECLIP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "treeclip=debug,tower_http=debug"
    } else {
        "treeclip=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config from file if provided, otherwise use defaults
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    // CLI flags win over the config file
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let state = AppState {
        config: Arc::new(config.clone()),
    };

    // The browser frontend runs on its own dev server
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .merge(routes::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.bind, config.port).parse()?;
    info!("Starting treeclip on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
