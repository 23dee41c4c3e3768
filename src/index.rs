use std::sync::Arc;

use axum::{debug_handler, extract::State, response::{IntoResponse, Redirect, Response}};
use axum_extra::extract::CookieJar;
use tera::{Context, Tera};

use crate::{res, session, AppResult};

#[debug_handler]
pub async fn index() -> Redirect {
    Redirect::to("/login")
}

/// The quiz page. The quiz itself lives in `/static/test.js`.
#[debug_handler]
pub async fn test(
    State(templates): State<Arc<Tera>>,
    jar: CookieJar,
) -> AppResult<Response> {
    let Some(username) = session::resolve(&jar) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let mut context = Context::new();
    context.insert("username", &username);
    Ok(res::render(&templates, "test.html", &context)?.into_response())
}
