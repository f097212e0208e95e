//! Cache
//!
//! Este módulo contiene los sistemas de cache. Las plantillas de ruta se
//! leen en cada sondeo de progreso y se cachean en Redis si está configurado.

pub mod cache_config;
pub mod redis_client;
pub mod route_cache;

use anyhow::Result;
use async_trait::async_trait;

pub use cache_config::CacheConfig;
pub use redis_client::RedisClient;
pub use route_cache::CachedRouteStore;

/// Operaciones básicas sobre valores serializados
#[async_trait]
pub trait CacheOperations: Send + Sync {
    async fn get_raw(&self, key: &str) -> Result<Option<String>>;
    async fn set_raw(&self, key: &str, value: String, ttl: u64) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}
