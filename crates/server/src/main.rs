use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tunefetch_core::{
    config::CONFIG_PATH_VAR, load_config, validate_config, AudioLocator, DownloadOrchestrator,
    MetadataCatalog, SpotifyClient, YtDlpLocator,
};
use tunefetch_server::api::create_router;
use tunefetch_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");

    // Metadata catalog; without a token nothing can be resolved
    let spotify = SpotifyClient::new(config.spotify.clone())
        .context("Failed to create Spotify client")?;
    spotify
        .authenticate()
        .await
        .context("Failed to authenticate with Spotify")?;
    info!("Authenticated with {}", spotify.name());
    let catalog: Arc<dyn MetadataCatalog> = Arc::new(spotify);

    // A missing yt-dlp only fails individual downloads
    let ytdlp = YtDlpLocator::new(config.downloader.clone());
    match ytdlp.validate().await {
        Ok(()) => info!("Using audio locator: {}", ytdlp.name()),
        Err(e) => warn!("Audio locator unavailable, downloads will fail: {}", e),
    }
    let locator: Arc<dyn AudioLocator> = Arc::new(ytdlp);

    let orchestrator = Arc::new(DownloadOrchestrator::new(
        catalog,
        locator,
        &config.pipeline,
    ));
    info!("Download orchestrator ready");

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, orchestrator));
    let app = create_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
