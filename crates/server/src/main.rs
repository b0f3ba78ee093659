use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grabdock_core::{
    load_config, validate_config, DownloadPipeline, JsonUserStore, S3Store, SessionSigner,
    StoreHandle, YtDlpExtractor,
};

use grabdock_server::api::create_router;
use grabdock_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
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
    let config_path = std::env::var("GRABDOCK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Auth enabled: {}", config.auth.enabled);
    info!("Storage bucket: {}", config.storage.bucket);

    // Probe the object store once at startup. When it is unreachable
    // the service still comes up, with every store-backed operation
    // reporting unavailability until a restart.
    let store = match S3Store::connect(&config.storage).await {
        Ok(s3) => {
            info!(bucket = %config.storage.bucket, "object store connected");
            StoreHandle::ready(Arc::new(s3))
        }
        Err(e) => {
            warn!(error = %e, "object store unreachable, store-backed endpoints disabled");
            StoreHandle::disabled(e.to_string())
        }
    };

    // Create extraction engine
    let extractor = Arc::new(YtDlpExtractor::new(config.extractor.clone()));
    info!("Extraction engine: {}", config.extractor.ytdlp_bin);

    // Create download pipeline
    let pipeline = DownloadPipeline::new(extractor, store.clone(), config.pipeline.clone());

    // Create user store and session signer
    let users = JsonUserStore::new(store.clone());
    let signer = SessionSigner::new(&config.auth.session_secret, config.auth.token_ttl_secs);

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), pipeline, users, signer));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
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
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
