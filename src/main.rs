// src/main.rs

use std::sync::Arc;

use classroom_qa::config::Config;
use classroom_qa::routes;
use classroom_qa::state::AppState;
use classroom_qa::store::{JsonFileStore, MemoryStore, RecordStore};
use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Open the record store. A wiped or missing file starts empty.
    let store: Arc<dyn RecordStore> = match &config.data_path {
        Some(path) => {
            let store = JsonFileStore::open(path)?;
            tracing::info!("Using record store at {}", store.path().display());
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATA_PATH not set, records are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    // Create AppState
    let state = AppState::new(store);

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    // Start the server
    axum::serve(listener, app).await?;
    Ok(())
}
