use std::sync::Arc;

use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}, Form};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use sqlx::SqlitePool;
use tera::Tera;

use crate::{res, session, AppError, AppResult, AppState};

use super::{check_credentials, AuthError, PasswordHasher, INVALID_CREDENTIALS};

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[debug_handler]
pub(crate) async fn login_page(State(templates): State<Arc<Tera>>) -> AppResult<Html<String>> {
    res::login_page(&templates, None)
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    State(hasher): State<PasswordHasher>,
    State(templates): State<Arc<Tera>>,
    jar: CookieJar,
    Form(LoginForm { username, password }): Form<LoginForm>,
) -> AppResult<Response> {
    tracing::info!("login attempt with username: '{}'", username.trim());

    match check_credentials(&db_pool, &hasher, &username, &password).await {
        Ok(username) => {
            tracing::info!("welcome {username}");
            Ok((session::issue(jar, &username), Redirect::to("/chat")).into_response())
        }
        Err(AuthError::Hash(e)) => Err(AppError(e)),
        Err(_) => Ok(res::login_page(&templates, Some(INVALID_CREDENTIALS))?.into_response()),
    }
}
