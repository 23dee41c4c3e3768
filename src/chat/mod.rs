mod feed;
mod messages;
mod page;

use axum::{routing::get, Router};

use crate::AppState;

pub use feed::{list_recent, post_message, FEED_LIMIT};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", get(page::chat).post(page::post_chat))
        .route("/messages", get(messages::messages))
}
