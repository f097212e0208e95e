//! Pool de PostgreSQL
//!
//! El tamaño máximo del pool sale de `DB_MAX_CONNECTIONS`; los timeouts son fijos.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use super::environment::{EnvironmentConfig, StorageBackend};

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl DatabaseConfig {
    /// `None` si el backend no es postgres o falta `DATABASE_URL`
    pub fn from_environment(config: &EnvironmentConfig) -> Option<Self> {
        if config.storage_backend != StorageBackend::Postgres {
            return None;
        }
        config.database_url.as_ref().map(|url| Self {
            url: url.clone(),
            max_connections: config.database_max_connections,
            min_connections: config.database_max_connections.min(2),
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
        })
    }

    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .test_before_acquire(true)
            .connect(&self.url)
            .await
    }
}
