use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::{password::PasswordHasher, token::TokenService};
use crate::config::AppConfig;

/// Shared per-process state. The config, hasher and token service are built
/// once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub hasher: Arc<PasswordHasher>,
    pub tokens: TokenService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Self::from_parts(db, config)
    }

    pub fn from_parts(db: PgPool, config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let hasher = Arc::new(PasswordHasher::new(&config.auth)?);
        let tokens = TokenService::new(&config.auth);
        Ok(Self {
            db,
            config,
            hasher,
            tokens,
        })
    }
}
