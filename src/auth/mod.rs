use axum::{routing::get, Router};
use sqlx::SqlitePool;

use crate::{db, AppState};

mod login;
mod password;
mod register;

pub use password::PasswordHasher;

pub const TAKEN: &str = "Username is taken or another error occurred";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The insert failed. A duplicate name and any other store error look the same.
    #[error("username taken or other error")]
    UsernameTaken(#[source] sqlx::Error),
    #[error("username is empty")]
    EmptyUsername,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Hash(anyhow::Error),
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(register::register_page).post(register::register))
        .route("/login", get(login::login_page).post(login::login))
}

/// Creates an account; the name is trimmed before it is stored.
pub async fn create_user(
    db_pool: &SqlitePool,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<i64, AuthError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AuthError::EmptyUsername);
    }
    let hash = hasher.hash(password).map_err(AuthError::Hash)?;

    let result = sqlx::query("INSERT INTO users (username,password) VALUES (?,?)")
        .bind(username)
        .bind(hash)
        .execute(db_pool)
        .await
        .map_err(AuthError::UsernameTaken)?;

    Ok(result.last_insert_rowid())
}

/// Checks credentials and returns the canonical (trimmed) username on success.
pub async fn check_credentials(
    db_pool: &SqlitePool,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<String, AuthError> {
    let username = username.trim();
    let user = match db::find_user(db_pool, username).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(AuthError::InvalidCredentials),
        Err(e) => {
            tracing::warn!("user lookup for '{username}' failed: {e}");
            return Err(AuthError::InvalidCredentials);
        }
    };

    if !hasher.verify(password, &user.password) {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(user.username)
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::config::PasswordCost;

    async fn setup() -> (SqlitePool, PasswordHasher) {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_schema(&db_pool).await.unwrap();
        let hasher = PasswordHasher::new(PasswordCost { memory_kib: 1024, iterations: 1, parallelism: 1 }).unwrap();
        (db_pool, hasher)
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let (db_pool, hasher) = setup().await;
        create_user(&db_pool, &hasher, "alice", "pw1").await.unwrap();

        let err = create_user(&db_pool, &hasher, "  alice ", "other").await.unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken(_)));

        // the first account still has its own password
        assert_eq!(check_credentials(&db_pool, &hasher, "alice", "pw1").await.unwrap(), "alice");
        assert!(check_credentials(&db_pool, &hasher, "alice", "other").await.is_err());
    }

    #[tokio::test]
    async fn login_errors_are_indistinguishable() {
        let (db_pool, hasher) = setup().await;
        create_user(&db_pool, &hasher, "bob", "secret").await.unwrap();

        let wrong_password = check_credentials(&db_pool, &hasher, "bob", "nope").await.unwrap_err();
        let unknown_user = check_credentials(&db_pool, &hasher, "carol", "secret").await.unwrap_err();
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn blank_username_is_refused() {
        let (db_pool, hasher) = setup().await;
        let err = create_user(&db_pool, &hasher, "   ", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::EmptyUsername));
    }

    #[tokio::test]
    async fn username_is_trimmed() {
        let (db_pool, hasher) = setup().await;
        create_user(&db_pool, &hasher, "  dave\t", "pw").await.unwrap();
        assert!(db::find_user(&db_pool, "dave").await.unwrap().is_some());
        assert_eq!(check_credentials(&db_pool, &hasher, " dave ", "pw").await.unwrap(), "dave");
    }
}
