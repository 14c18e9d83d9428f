use anyhow::Context;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use userbook::{build_router, config::Config, db::Database, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("userbook=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;

    // An unreachable database at boot is fatal
    let db = Database::connect(&config).await.map_err(|e| {
        error!("Failed to connect to MongoDB: {:#}", e);
        e
    })?;

    let state = Arc::new(AppState {
        store: Arc::new(db.clone()),
        config: config.clone(),
    });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server_address))?;
    info!("Server starting on {}", config.server_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    db.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
