use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use tracing::{debug, info};

use super::{CacheConfig, CacheOperations};
use crate::database::mask_database_url;

/// Cliente Redis sobre un `ConnectionManager` que reconecta solo
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
}

impl RedisClient {
    /// Conectar y comprobar con PING antes de activar el cache
    pub async fn new(config: &CacheConfig) -> Result<Self> {
        info!("🔗 Conectando a Redis en {}", mask_database_url(&config.redis_url));

        let client = redis::Client::open(config.redis_url.as_str()).context("REDIS_URL inválida")?;
        let manager = ConnectionManager::new(client)
            .await
            .context("No se pudo conectar a Redis")?;

        let mut conn = manager.clone();
        let _: () = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("Redis no responde al PING")?;

        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheOperations for RedisClient {
    async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await.with_context(|| format!("GET {}", key))?;
        debug!("📥 Cache {} {}", if value.is_some() { "HIT" } else { "MISS" }, key);
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: String, ttl: u64) -> Result<()> {
        let mut conn = self.manager.clone();
        let _: () = conn
            .set_ex(key, value, ttl)
            .await
            .with_context(|| format!("SETEX {}", key))?;
        debug!("💾 Cache SET {} (TTL {}s)", key, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        let removed: i64 = conn.del(key).await.with_context(|| format!("DEL {}", key))?;
        debug!("🗑️ Cache DEL {} ({})", key, removed);
        Ok(())
    }
}
