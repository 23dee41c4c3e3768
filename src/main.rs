use std::sync::Arc;

use anyhow::{Context, Result};
use chitchat::{auth::PasswordHasher, config::Config, db, profiles::AvatarStore, res, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::debug!("config: {config:?}");

    let db_pool = db::connect(&config.database_url, config.db_max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    let avatars = AvatarStore::new(&config.static_dir);
    tokio::fs::create_dir_all(avatars.dir())
        .await
        .with_context(|| format!("failed to create {}", avatars.dir().display()))?;

    let app_state = AppState {
        db_pool,
        hasher: PasswordHasher::new(config.password_cost)?,
        avatars,
        templates: Arc::new(res::templates().context("failed to load page templates")?),
    };

    let app = chitchat::app(app_state, &config.static_dir);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!("listening on http://{}", config.listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
