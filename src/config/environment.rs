//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Todas las variables tienen un valor por defecto de desarrollo salvo
//! `JWT_SECRET` y `DATABASE_URL` en producción.

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

/// Backend de persistencia
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("STORAGE_BACKEND desconocido: {}", other),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window: u64,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub redis_url: Option<String>,
    /// Fracción de la tarifa devuelta al cancelar
    pub refund_ratio: Decimal,
    /// TTL en segundos de las rutas cacheadas
    pub route_cache_ttl: u64,
    pub bcrypt_cost: u32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            jwt_secret: "dev-secret-change-me".to_string(),
            jwt_expiration: 86400,
            cors_origins: vec!["*".to_string()],
            rate_limit_requests: 100,
            rate_limit_window: 60,
            storage_backend: StorageBackend::Memory,
            database_url: None,
            database_max_connections: 20,
            redis_url: None,
            refund_ratio: Decimal::new(5, 1),
            route_cache_ttl: 300,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) if database_url.is_some() => StorageBackend::Postgres,
            Err(_) => defaults.storage_backend,
        };

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if environment == "production" => bail!("JWT_SECRET must be set in production"),
            Err(_) => defaults.jwt_secret,
        };

        let refund_ratio = match env::var("REFUND_RATIO") {
            Ok(value) => Decimal::from_str(value.trim())
                .with_context(|| format!("REFUND_RATIO inválido: {}", value))?,
            Err(_) => defaults.refund_ratio,
        };
        if refund_ratio < Decimal::ZERO || refund_ratio > Decimal::ONE {
            bail!("REFUND_RATIO debe estar entre 0 y 1");
        }

        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORAGE_BACKEND=postgres");
        }

        Ok(Self {
            environment,
            port: parse_var("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            jwt_secret,
            jwt_expiration: parse_var("JWT_EXPIRATION", defaults.jwt_expiration)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            rate_limit_requests: parse_var("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests)?,
            rate_limit_window: parse_var("RATE_LIMIT_WINDOW", defaults.rate_limit_window)?,
            storage_backend,
            database_url,
            database_max_connections: parse_var("DB_MAX_CONNECTIONS", defaults.database_max_connections)?,
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            refund_ratio,
            route_cache_ttl: parse_var("ROUTE_CACHE_TTL", defaults.route_cache_ttl)?,
            bcrypt_cost: parse_var("BCRYPT_COST", defaults.bcrypt_cost)?,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert!(config.is_development());
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.refund_ratio, Decimal::new(5, 1));
        assert_eq!(config.server_url(), "0.0.0.0:3000");
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!("Postgres".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }
}
