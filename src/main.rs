//! TTL KV - An in-memory key/value store with per-key expiration
//!
//! Runs the store as a long-lived process that survives restarts through
//! its snapshot file.

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_kv::{spawn_cleanup_task, spawn_snapshot_task, Config, Db};

/// Main entry point for the store process.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the configured backend and rehydrate it from the snapshot
/// 4. Start background sweep and snapshot tasks
/// 5. Wait for SIGINT/SIGTERM
/// 6. Write a final snapshot before exiting
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_kv=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TTL KV store");

    let config = Config::from_env();
    info!(
        "Configuration loaded: snapshot_path={}, backend={}, cleanup_interval={}s, snapshot_interval={}s",
        config.snapshot_path.display(),
        config.backend,
        config.cleanup_interval,
        config.snapshot_interval
    );

    let db = Db::open(&config)
        .await
        .with_context(|| format!("failed to load {}", config.snapshot_path.display()))?;
    info!("Store ready with {} entries", db.len().await);

    let mut background = Vec::new();
    if config.cleanup_interval > 0 {
        background.push(spawn_cleanup_task(db.clone(), config.cleanup_interval));
    }
    if config.snapshot_interval > 0 {
        background.push(spawn_snapshot_task(
            db.clone(),
            config.snapshot_path.clone(),
            config.snapshot_interval,
        ));
    }

    shutdown_signal().await?;

    for handle in background {
        handle.abort();
    }
    warn!("Background tasks aborted");

    info!("Saving final snapshot before exiting...");
    db.save_snapshot(&config.snapshot_path)
        .await
        .context("final snapshot failed")?;

    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> anyhow::Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<(), anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<anyhow::Result<()>>();

    tokio::select! {
        res = ctrl_c => {
            res?;
            info!("Received Ctrl+C, initiating shutdown...");
        }
        res = terminate => {
            res?;
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
    Ok(())
}
