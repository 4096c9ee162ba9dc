use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{fmt, EnvFilter};

use symposium::adapters::auth::MockUserRepository;
use symposium::adapters::http::{api_router, with_http_layers, AppState};
use symposium::adapters::postgres::{
    self, PostgresEventRepository, PostgresForumMessageStore, PostgresUserRepository,
};
use symposium::adapters::storage::{InMemoryEventRepository, InMemoryForumMessageStore};
use symposium::adapters::websocket::RoomManager;
use symposium::config::{AppConfig, ServerConfig};
use symposium::ports::{EventRepository, ForumMessageStore, UserRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(environment = ?config.server.environment, "Starting symposium");

    let (users, events, history): (
        Arc<dyn UserRepository>,
        Arc<dyn EventRepository>,
        Arc<dyn ForumMessageStore>,
    ) = match &config.database {
        Some(database) => {
            tracing::info!(url = %database.redacted_url(), "Connecting to database");
            let pool = postgres::connect(database).await?;
            (
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresEventRepository::new(pool.clone())),
                Arc::new(PostgresForumMessageStore::new(pool)),
            )
        }
        None => {
            tracing::warn!("No database configured, using in-memory storage");
            (
                Arc::new(MockUserRepository::new()),
                Arc::new(InMemoryEventRepository::new()),
                Arc::new(InMemoryForumMessageStore::new()),
            )
        }
    };
    let transport = Arc::new(RoomManager::new(config.chat.channel_capacity));

    let state = AppState::new(&config, users, events, history, transport);
    let app = with_http_layers(api_router(state), &config.server);

    let address = config.server.socket_addr()?;
    let listener = TcpListener::bind(address).await?;
    tracing::info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.json_logs {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
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
