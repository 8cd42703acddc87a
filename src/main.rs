use anyhow::Context;
use tracing_subscriber::EnvFilter;

use datamodel_api::config;
use datamodel_api::database::DatabaseManager;
use datamodel_api::is_production;
use datamodel_api::server;
use datamodel_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting Data Model API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        if is_production!() {
            anyhow::bail!("SECURITY_JWT_SECRET must be set in production");
        }
        tracing::warn!("JWT secret not configured; every bearer token will be rejected");
    }

    let pool = DatabaseManager::connect_lazy(&config.database).context("building database pool")?;
    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await.context("running migrations")?;
    }

    let state = AppState::from_pool(pool, config.security.clone());
    let app = server::app(state, &config.api);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Data Model API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
