use std::sync::Arc;

use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tera::Tera;

use crate::{res, AppError, AppResult, AppState};

use super::{create_user, AuthError, PasswordHasher, TAKEN};

#[derive(Deserialize)]
pub(crate) struct RegisterForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[debug_handler]
pub(crate) async fn register_page(State(templates): State<Arc<Tera>>) -> AppResult<Html<String>> {
    res::register_page(&templates, None)
}

#[debug_handler(state = AppState)]
pub(crate) async fn register(
    State(db_pool): State<SqlitePool>,
    State(hasher): State<PasswordHasher>,
    State(templates): State<Arc<Tera>>,
    Form(RegisterForm { username, password }): Form<RegisterForm>,
) -> AppResult<Response> {
    tracing::info!("register attempt with username: '{}'", username.trim());

    match create_user(&db_pool, &hasher, &username, &password).await {
        Ok(user_id) => {
            tracing::info!("registered '{}' as #{user_id}", username.trim());
            Ok(Redirect::to("/login").into_response())
        }
        Err(AuthError::Hash(e)) => Err(AppError(e)),
        Err(e) => {
            tracing::info!("registration of '{}' refused: {e:?}", username.trim());
            Ok(res::register_page(&templates, Some(TAKEN))?.into_response())
        }
    }
}
