use std::sync::Arc;

use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}, Form};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use sqlx::SqlitePool;
use tera::{Context, Tera};

use crate::{res, session, AppResult, AppState};

use super::feed::{self, FEED_LIMIT};

#[derive(Deserialize)]
pub(crate) struct ChatForm {
    #[serde(default)]
    message: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn chat(
    State(db_pool): State<SqlitePool>,
    State(templates): State<Arc<Tera>>,
    jar: CookieJar,
) -> AppResult<Response> {
    let Some(username) = session::resolve(&jar) else {
        return Ok(Redirect::to("/login").into_response());
    };

    Ok(render(&db_pool, &templates, &username).await?.into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn post_chat(
    State(db_pool): State<SqlitePool>,
    State(templates): State<Arc<Tera>>,
    jar: CookieJar,
    Form(ChatForm { message }): Form<ChatForm>,
) -> AppResult<Response> {
    let Some(username) = session::resolve(&jar) else {
        return Ok(Redirect::to("/login").into_response());
    };

    match feed::post_message(&db_pool, &username, &message).await {
        Ok(true) => tracing::debug!("{username} posted a message"),
        Ok(false) => {}
        Err(e) => tracing::warn!("could not store message from {username}: {e}"),
    }

    Ok(render(&db_pool, &templates, &username).await?.into_response())
}

async fn render(db_pool: &SqlitePool, templates: &Tera, username: &str) -> AppResult<Html<String>> {
    let messages = feed::list_recent(db_pool, FEED_LIMIT)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("could not load chat feed: {e}");
            Vec::new()
        });

    let mut context = Context::new();
    context.insert("username", username);
    context.insert("messages", &messages);
    res::render(templates, "chat.html", &context)
}
