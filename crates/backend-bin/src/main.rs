use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use backend_lib::{config::Settings, router, storage::FlatFileStore, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Try the default location first, then an explicit relative path
    let settings = Settings::load().or_else(|_| Settings::load_from("./config/default"))?;

    // Initialize tracing; RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .init();

    // Create storage
    let storage = FlatFileStore::new(&settings.data_dir)?;

    // Create application state
    let bind_addr = settings.bind_addr;
    let state = Arc::new(AppState::new(storage, settings));

    // Create the router
    let app = router::create_router(state);

    // Start the server
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
