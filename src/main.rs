use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use stream_assist::config::{Cli, Config, OriginPolicy};
use stream_assist::generation::OpenAiClient;
use stream_assist::server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "stream_assist=debug,tower_http=debug"
    } else {
        "stream_assist=info,tower_http=info"
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| filter.into());

    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }

    info!("stream-assist v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration.
    let config = Arc::new(Config::from_env());

    match &config.origins {
        OriginPolicy::Any => info!("CORS: all origins allowed"),
        OriginPolicy::List(origins) => info!(origins = ?origins, "CORS: origin allow-list"),
    }
    if config.client_api_key.is_none() {
        warn!("CLIENT_API_KEY not set; API key check disabled");
    }
    if config.upstream.api_key.is_none() {
        warn!("OPENAI_API_KEY not set; generation endpoints will fail");
    }
    info!(
        model = %config.upstream.model,
        url = %config.upstream.completions_url(),
        "Upstream configured"
    );

    // Build application state.
    let generator = OpenAiClient::new(config.upstream.clone());
    let state = Arc::new(AppState {
        config: config.clone(),
        generator: Arc::new(generator),
    });

    // Build the HTTP router.
    let app = build_router(state);

    // Start the server.
    let listen_addr = cli.listen_addr();
    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
