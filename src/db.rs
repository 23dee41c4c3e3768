use serde::Serialize;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::res::DEFAULT_AVATAR;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub avatar: Option<String>,

    // unique: username
}

/// One line of the chat feed, as shown on `/chat` and served by `/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEntry {
    pub username: String,
    pub avatar: String,
    pub content: String,
}

impl FeedEntry {
    pub fn new(username: String, avatar: Option<String>, content: String) -> Self {
        FeedEntry {
            username,
            avatar: avatar_url(avatar),
            content,
        }
    }
}

pub fn avatar_url(avatar: Option<String>) -> String {
    avatar
        .filter(|avatar| !avatar.is_empty())
        .unwrap_or_else(|| DEFAULT_AVATAR.to_owned())
}

pub async fn connect(url: &str, max_connections: u32) -> sqlx::Result<SqlitePool> {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;
    init_schema(&db_pool).await?;
    Ok(db_pool)
}

pub async fn init_schema(db_pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            avatar TEXT
        )",
    )
    .execute(db_pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            content TEXT NOT NULL,
            timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(db_pool)
    .await?;

    Ok(())
}

pub async fn find_user(db_pool: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT id,username,password,avatar FROM users WHERE username=?")
        .bind(username)
        .fetch_optional(db_pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_avatar_uses_placeholder() {
        assert_eq!(avatar_url(None), DEFAULT_AVATAR);
        assert_eq!(avatar_url(Some(String::new())), DEFAULT_AVATAR);
        assert_eq!(avatar_url(Some("/static/avatars/a.png".into())), "/static/avatars/a.png");
    }

    #[tokio::test]
    async fn schema_init_is_idempotent() {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_schema(&db_pool).await.unwrap();
        init_schema(&db_pool).await.unwrap();

        assert!(find_user(&db_pool, "nobody").await.unwrap().is_none());
    }
}
