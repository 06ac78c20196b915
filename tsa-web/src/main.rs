//! tsa-web - tweet stance annotation service
//!
//! Startup resolves configuration (flags and environment, then the TOML
//! file, then defaults), opens the database, derives the set walk order once
//! and serves until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tsa_common::config::{ConfigFile, ServiceConfig, TomlConfig};
use tsa_common::db::init_database;
use tsa_common::session::load_session_secret;
use tsa_web::allocation::{SetOrder, ORDER_SEED};
use tsa_web::cli::Args;
use tsa_web::db::AnnotationStore;
use tsa_web::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (toml_config, config_file) = TomlConfig::load_or_default(args.config.as_deref());
    let config = ServiceConfig::resolve(args.overrides(), &toml_config)
        .context("Invalid configuration")?;

    // RUST_LOG, when set, replaces the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{},sqlx=warn", config.log_level))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting tsa-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match config_file {
        ConfigFile::Loaded(path) => info!("Loaded config file: {}", path.display()),
        ConfigFile::Absent => debug!("No config file, using defaults"),
        ConfigFile::Unusable(e) => warn!("{} - using defaults", e),
    }
    info!("Database path: {}", config.database_path.display());

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to open database")?;
    let session_secret = load_session_secret(&pool)
        .await
        .context("Failed to load session secret")?;

    let store = AnnotationStore::new(pool);
    let total_sets = store.count_sets().await.context("Failed to count sets")?;
    if total_sets == 0 {
        warn!("The sets table is empty: every annotator will be told no set is available");
    }

    let order = SetOrder::compute(total_sets, ORDER_SEED);
    info!("{} sets in assignment order", order.len());

    let app = build_router(AppState::new(store, order, session_secret));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("tsa-web listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
