//! Server binary: reads settings, prepares the database, serves the API.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use wishlist_api::{app, ensure_database_exists, ensure_schema, AppState, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wishlist_api=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    ensure_database_exists(&settings.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;
    ensure_schema(&pool).await?;

    let state = AppState { pool };
    let listener = TcpListener::bind(format!("0.0.0.0:{}", settings.listen_port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
