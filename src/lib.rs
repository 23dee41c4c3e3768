pub mod appresult;
pub mod auth;
pub mod chat;
pub mod config;
pub mod db;
pub mod index;
pub mod profiles;
pub mod res;
pub mod session;

use std::{path::Path, sync::Arc};

use axum::{extract::FromRef, routing::get, Router};
use sqlx::SqlitePool;
use tera::Tera;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use appresult::{AppError, AppResult};
use auth::PasswordHasher;
use profiles::AvatarStore;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub hasher: PasswordHasher,
    pub avatars: AvatarStore,
    pub templates: Arc<Tera>,
}

/// The whole site: pages, the JSON feed, and `/static/*` served from `static_dir`.
pub fn app(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(index::index))
        .route("/test", get(index::test))

        .merge(auth::router())
        .merge(chat::router())
        .merge(profiles::router())
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))

        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
