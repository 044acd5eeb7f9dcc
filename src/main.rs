use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use taskflow_api::config;
use taskflow_api::database::{DatabaseManager, PgStore, Store};
use taskflow_api::state::AppState;

#[derive(Parser)]
#[command(name = "taskflow-api")]
#[command(about = "Personal task-management REST API")]
#[command(version)]
struct Args {
    #[arg(long, env = "HOST", default_value = "0.0.0.0", help = "Interface to bind")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 5000, help = "Port to listen on")]
    port: u16,

    #[arg(long, env = "TASKFLOW_STORE", value_enum, default_value_t = StoreKind::Postgres, help = "Document store backend")]
    store: StoreKind,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StoreKind {
    /// PostgreSQL at DATABASE_URL
    Postgres,
    /// Process-local tables, lost on exit
    Memory,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("taskflow_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting taskflow-api in {:?} mode", config.environment);
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let store: Arc<dyn Store> = match args.store {
        StoreKind::Postgres => {
            let url = DatabaseManager::database_url()?;
            let pool = DatabaseManager::connect(&url, &config.database).await?;
            let store = PgStore::new(pool);
            store.migrate().await.context("failed to apply schema")?;
            Arc::new(store)
        }
        StoreKind::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on exit");
            Arc::new(taskflow_api::database::MemoryStore::new())
        }
    };

    let app = taskflow_api::app(AppState::new(store));

    let bind_addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("taskflow-api listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
