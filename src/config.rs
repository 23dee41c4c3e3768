use std::{path::PathBuf, str::FromStr};

use anyhow::{Context, Result};

/// Argon2id cost parameters used when hashing new passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordCost {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

/// Server configuration, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub static_dir: PathBuf,
    pub db_max_connections: u32,
    pub password_cost: PasswordCost,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        let defaults = PasswordCost::default();

        Ok(Config {
            database_url: var_or("DATABASE_URL", "sqlite://messenger.db?mode=rwc"),
            listen_addr: var_or("LISTEN_ADDR", "0.0.0.0:8080"),
            static_dir: PathBuf::from(var_or("STATIC_DIR", "static")),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 16)?,
            password_cost: PasswordCost {
                memory_kib: parse_var("PASSWORD_MEMORY_KIB", defaults.memory_kib)?,
                iterations: parse_var("PASSWORD_ITERATIONS", defaults.iterations)?,
                parallelism: parse_var("PASSWORD_PARALLELISM", defaults.parallelism)?,
            },
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    dotenv::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match dotenv::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} is not a valid number: {raw:?}")),
        Err(_) => Ok(default),
    }
}
