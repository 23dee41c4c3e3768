use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{multipart::{Field, MultipartError}, Multipart, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use sqlx::SqlitePool;
use tera::{Context, Tera};

use crate::{res, session, AppResult, AppState};

use super::{avatar_of, rename, set_avatar, AvatarStore, RENAME_FAILED};

#[debug_handler(state = AppState)]
pub(crate) async fn profile(
    State(db_pool): State<SqlitePool>,
    State(templates): State<Arc<Tera>>,
    jar: CookieJar,
) -> AppResult<Response> {
    let Some(username) = session::resolve(&jar) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let avatar = avatar_of(&db_pool, &username).await;
    Ok(render(&templates, &username, &avatar, None)?.into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_profile(
    State(db_pool): State<SqlitePool>,
    State(avatars): State<AvatarStore>,
    State(templates): State<Arc<Tera>>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let Some(username) = session::resolve(&jar) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let mut new_username = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Ok(e.into_response()),
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("username") => match field.text().await {
                Ok(text) => new_username = Some(text.trim().to_owned()),
                Err(e) => return Ok(e.into_response()),
            },
            Some("avatar") => {
                if let Err(e) = store_avatar(&db_pool, &avatars, &username, field).await {
                    return Ok(e.into_response());
                }
            }
            _ => {}
        }
    }

    let avatar = avatar_of(&db_pool, &username).await;

    let Some(new_username) = new_username.filter(|name| !name.is_empty() && *name != username) else {
        return Ok(render(&templates, &username, &avatar, None)?.into_response());
    };

    match rename(&db_pool, &username, &new_username).await {
        Ok(()) => {
            tracing::info!("{username} is now known as {new_username}");
            Ok((
                session::issue(jar, &new_username),
                render(&templates, &new_username, &avatar, None)?,
            )
                .into_response())
        }
        Err(e) => {
            tracing::info!("rename refused: {e:?}");
            Ok(render(&templates, &username, &avatar, Some(RENAME_FAILED))?.into_response())
        }
    }
}

/// Streams an uploaded avatar to disk and points the user at it.
///
/// Local failures (bad name, disk, store) are logged and skipped; only a broken
/// request body is an error. Either way a half-written upload is thrown away.
async fn store_avatar(
    db_pool: &SqlitePool,
    avatars: &AvatarStore,
    username: &str,
    mut field: Field<'_>,
) -> Result<(), MultipartError> {
    let file_name = field.file_name().unwrap_or_default().to_owned();
    if file_name.is_empty() {
        return Ok(());
    }

    let mut pending = match avatars.create(&file_name).await {
        Ok(pending) => Some(pending),
        Err(e) => {
            tracing::warn!("avatar upload from {username} skipped: {e}");
            None
        }
    };

    while let Some(chunk) = field.chunk().await? {
        let Some(upload) = pending.as_mut() else {
            continue;
        };
        if let Err(e) = upload.write(&chunk).await {
            tracing::warn!("could not write avatar {}: {e}", upload.url());
            pending = None;
        }
    }

    let Some(upload) = pending else {
        return Ok(());
    };
    match upload.commit().await {
        Ok(url) => {
            if let Err(e) = set_avatar(db_pool, username, &url).await {
                tracing::warn!("could not record avatar of {username}: {e}");
            }
        }
        Err(e) => tracing::warn!("could not store avatar of {username}: {e}"),
    }
    Ok(())
}

fn render(templates: &Tera, username: &str, avatar: &str, error: Option<&str>) -> AppResult<Html<String>> {
    let mut context = Context::new();
    context.insert("username", username);
    context.insert("avatar", avatar);
    context.insert("error", &error);
    res::render(templates, "profile.html", &context)
}
