//! Cache read-through de plantillas de ruta
//!
//! Envuelve cualquier `RouteStore`: `find_by_id` consulta primero el cache y
//! las escrituras invalidan la clave. Un fallo del cache nunca falla la
//! petición, se cae al repositorio.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use super::cache_config::make_key;
use super::CacheOperations;
use crate::models::route_template::RouteTemplate;
use crate::repositories::RouteStore;
use crate::utils::errors::AppResult;

pub struct CachedRouteStore {
    inner: Arc<dyn RouteStore>,
    cache: Arc<dyn CacheOperations>,
    ttl: u64,
}

impl CachedRouteStore {
    pub fn new(inner: Arc<dyn RouteStore>, cache: Arc<dyn CacheOperations>, ttl: u64) -> Self {
        Self { inner, cache, ttl }
    }

    fn key(id: Uuid) -> String {
        make_key("route", &id.to_string())
    }

    async fn cached(&self, id: Uuid) -> Option<RouteTemplate> {
        match self.cache.get_raw(&Self::key(id)).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(route) => Some(route),
                Err(e) => {
                    warn!("⚠️ Ruta cacheada ilegible {}: {}", id, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("⚠️ Error leyendo ruta {} del cache: {}", id, e);
                None
            }
        }
    }

    async fn store(&self, route: &RouteTemplate) {
        let raw = match serde_json::to_string(route) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("⚠️ No se pudo serializar la ruta {}: {}", route.id, e);
                return;
            }
        };
        if let Err(e) = self.cache.set_raw(&Self::key(route.id), raw, self.ttl).await {
            warn!("⚠️ No se pudo cachear la ruta {}: {}", route.id, e);
        }
    }

    async fn invalidate(&self, id: Uuid) {
        if let Err(e) = self.cache.delete(&Self::key(id)).await {
            warn!("⚠️ No se pudo invalidar la ruta {}: {}", id, e);
        }
    }
}

#[async_trait]
impl RouteStore for CachedRouteStore {
    async fn create(&self, route: &RouteTemplate) -> AppResult<RouteTemplate> {
        self.inner.create(route).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RouteTemplate>> {
        if let Some(route) = self.cached(id).await {
            return Ok(Some(route));
        }

        let route = self.inner.find_by_id(id).await?;
        if let Some(route) = &route {
            self.store(route).await;
        }
        Ok(route)
    }

    async fn list(&self, include_inactive: bool) -> AppResult<Vec<RouteTemplate>> {
        self.inner.list(include_inactive).await
    }

    async fn update(&self, route: &RouteTemplate) -> AppResult<Option<RouteTemplate>> {
        let updated = self.inner.update(route).await?;
        self.invalidate(route.id).await;
        Ok(updated)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<RouteTemplate>> {
        let updated = self.inner.set_active(id, active).await?;
        self.invalidate(id).await;
        Ok(updated)
    }
}
