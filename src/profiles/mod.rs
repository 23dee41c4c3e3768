mod avatar;
mod page;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use sqlx::SqlitePool;

use crate::{db, AppState};

pub use avatar::{sanitize_file_name, AvatarStore, PendingAvatar};

pub const RENAME_FAILED: &str = "Could not change the username";

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("could not rename {from} to {to}")]
    RenameFailed {
        from: String,
        to: String,
        #[source]
        source: Option<sqlx::Error>,
    },
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(page::profile).post(page::update_profile))
        .layer(DefaultBodyLimit::disable())
}

/// The avatar URL to show for `username`; the placeholder when unset or unreadable.
pub async fn avatar_of(db_pool: &SqlitePool, username: &str) -> String {
    let avatar = match db::find_user(db_pool, username).await {
        Ok(user) => user.and_then(|user| user.avatar),
        Err(e) => {
            tracing::warn!("could not load avatar of {username}: {e}");
            None
        }
    };
    db::avatar_url(avatar)
}

pub async fn set_avatar(db_pool: &SqlitePool, username: &str, url: &str) -> Result<(), ProfileError> {
    sqlx::query("UPDATE users SET avatar=? WHERE username=?")
        .bind(url)
        .bind(username)
        .execute(db_pool)
        .await?;
    Ok(())
}

/// Renames `from` to `to`. Fails when `to` is taken or `from` no longer exists.
pub async fn rename(db_pool: &SqlitePool, from: &str, to: &str) -> Result<(), ProfileError> {
    let failed = |source| ProfileError::RenameFailed {
        from: from.to_owned(),
        to: to.to_owned(),
        source,
    };

    let result = sqlx::query("UPDATE users SET username=? WHERE username=?")
        .bind(to)
        .bind(from)
        .execute(db_pool)
        .await
        .map_err(|e| failed(Some(e)))?;

    if result.rows_affected() == 0 {
        return Err(failed(None));
    }
    Ok(())
}
