use axum::{debug_handler, extract::State, http::StatusCode, response::{IntoResponse, Response}, Json};
use sqlx::SqlitePool;

use super::feed::{list_recent, FEED_LIMIT};

/// The chat feed as JSON. Open to anyone, session or not.
#[debug_handler]
pub(crate) async fn messages(State(db_pool): State<SqlitePool>) -> Response {
    match list_recent(&db_pool, FEED_LIMIT).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => {
            tracing::warn!("could not load chat feed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "DB error").into_response()
        }
    }
}
