use sqlx::SqlitePool;

use crate::db::FeedEntry;

pub const FEED_LIMIT: u32 = 20;

/// Stores `content` as a message from `username`.
///
/// Empty content is dropped without touching the store. Returns whether a row
/// was written; an unknown username writes nothing.
pub async fn post_message(db_pool: &SqlitePool, username: &str, content: &str) -> sqlx::Result<bool> {
    if content.is_empty() {
        return Ok(false);
    }

    let result = sqlx::query("INSERT INTO messages (user_id,content) SELECT id,? FROM users WHERE username=?")
        .bind(content)
        .bind(username)
        .execute(db_pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Newest messages first, at most `limit`, attributed by the author's current name.
pub async fn list_recent(db_pool: &SqlitePool, limit: u32) -> sqlx::Result<Vec<FeedEntry>> {
    let rows: Vec<(String, Option<String>, String)> = sqlx::query_as(
        "SELECT u.username,u.avatar,m.content
        FROM messages m
        JOIN users u ON m.user_id = u.id
        ORDER BY m.timestamp DESC, m.id DESC
        LIMIT ?",
    )
    .bind(limit)
    .fetch_all(db_pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(username, avatar, content)| FeedEntry::new(username, avatar, content))
        .collect())
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::{db, res::DEFAULT_AVATAR};

    async fn setup() -> SqlitePool {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_schema(&db_pool).await.unwrap();
        for name in ["alice", "bob"] {
            sqlx::query("INSERT INTO users (username,password) VALUES (?,'x')")
                .bind(name)
                .execute(&db_pool)
                .await
                .unwrap();
        }
        db_pool
    }

    #[tokio::test]
    async fn newest_message_comes_first() {
        let db_pool = setup().await;
        assert!(post_message(&db_pool, "alice", "first").await.unwrap());
        assert!(post_message(&db_pool, "bob", "second").await.unwrap());

        let feed = list_recent(&db_pool, FEED_LIMIT).await.unwrap();
        assert_eq!(
            feed,
            vec![
                FeedEntry::new("bob".into(), None, "second".into()),
                FeedEntry::new("alice".into(), None, "first".into()),
            ]
        );
        assert_eq!(feed[0].avatar, DEFAULT_AVATAR);
    }

    #[tokio::test]
    async fn empty_message_is_dropped() {
        let db_pool = setup().await;
        post_message(&db_pool, "alice", "hi").await.unwrap();

        assert!(!post_message(&db_pool, "alice", "").await.unwrap());
        let feed = list_recent(&db_pool, FEED_LIMIT).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].content, "hi");
    }

    #[tokio::test]
    async fn unknown_author_writes_nothing() {
        let db_pool = setup().await;
        assert!(!post_message(&db_pool, "mallory", "boo").await.unwrap());
        assert!(list_recent(&db_pool, FEED_LIMIT).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn feed_is_capped() {
        let db_pool = setup().await;
        for i in 0..25 {
            post_message(&db_pool, "alice", &format!("msg {i}")).await.unwrap();
        }

        let feed = list_recent(&db_pool, FEED_LIMIT).await.unwrap();
        assert_eq!(feed.len(), 20);
        assert_eq!(feed[0].content, "msg 24");
        assert_eq!(feed[19].content, "msg 5");
    }
}
