//! Dev server: static assets, the in-memory REST API, and the index document for everything else.

use resource_pattern::{app, from_env, AppState, EntityStore};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("resource_pattern=info")),
        )
        .init();

    let config = from_env()?;
    let bind_addr = config.bind_addr;
    let state = AppState::new(EntityStore::new(), config);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Server running at {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
