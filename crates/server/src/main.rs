use std::sync::Arc;

use log::info;

use liftbook_server::{PgStore, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let config = ServerConfig::from_env()?;
    let store = PgStore::connect(&config.database_url).await?;
    let app = liftbook_server::router(Arc::new(store));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("server running on port {}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
