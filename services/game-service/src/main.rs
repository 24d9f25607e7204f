use std::sync::Arc;

use dotenv::dotenv;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use game_service::config::Config;
use game_service::db::PgStore;
use game_service::memory::MemoryStore;
use game_service::store::Store;
use game_service::{AppState, create_routes};

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("game_service=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
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

    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    setup_logging();

    let config = Config::from_env()?;

    let pg_store = match &config.database_url {
        Some(database_url) => {
            let store = PgStore::connect(database_url, config.max_connections).await?;
            store.migrate().await?;
            tracing::info!("connected to Postgres, migrations applied");
            Some(store)
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, data will only be kept in memory");
            None
        }
    };

    let store: Arc<dyn Store> = match &pg_store {
        Some(store) => Arc::new(store.clone()),
        None => Arc::new(MemoryStore::new()),
    };

    let app = create_routes(AppState::new(store));

    let http_addr = config.http_addr();
    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    tracing::info!("Server running on http://{}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(store) = pg_store {
        store.close().await;
        tracing::info!("database pool closed");
    }

    Ok(())
}
