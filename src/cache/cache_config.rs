//! Configuración de cache
//!
//! Este módulo contiene la configuración para el sistema de cache.

use crate::config::environment::EnvironmentConfig;

const KEY_PREFIX: &str = "shuttle_rides";

/// Configuración del cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub redis_url: String,
    pub default_ttl: u64,
}

impl CacheConfig {
    /// `None` si no hay `REDIS_URL`
    pub fn from_environment(config: &EnvironmentConfig) -> Option<Self> {
        config.redis_url.as_ref().map(|url| Self {
            redis_url: url.clone(),
            default_ttl: config.route_cache_ttl,
        })
    }
}

/// Generar clave de cache con prefijo
pub fn make_key(prefix: &str, identifier: &str) -> String {
    format!("{}:{}:{}", KEY_PREFIX, prefix, identifier)
}
