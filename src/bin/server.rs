//! API server: reads config from the environment, prepares the database and serves until Ctrl-C.

use doublee::{app, apply_migrations, ensure_database_exists, AppConfig, AppState, AuthSettings, PgStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("doublee=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    let config = AppConfig::from_env()?;

    ensure_database_exists(&config.database_url).await?;
    let pool = config.pool.options().connect(&config.database_url).await?;
    tracing::info!(
        max_connections = config.pool.max_connections,
        min_connections = config.pool.min_connections,
        "connected to database"
    );

    if config.run_migrations {
        apply_migrations(&pool).await?;
    }

    let auth = AuthSettings::new(
        config.jwt_secret.as_bytes(),
        config.session_ttl,
        config.bcrypt_cost,
    );
    let state = AppState::new(Arc::new(PgStore::new(pool.clone())), auth);
    let router = app(state, config.body_limit);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "unable to listen for shutdown signal");
    }
}
