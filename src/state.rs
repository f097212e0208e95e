//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Los repositorios se guardan como trait
//! objects para poder elegir PostgreSQL o memoria al arrancar.

use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::{CacheOperations, CachedRouteStore};
use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::RateLimitState;
use crate::repositories::{
    AssignmentRepository, AssignmentStore, InMemoryRepository, RouteRepository, RouteStore,
    SubscriptionRepository, SubscriptionStore, UserRepository, UserStore, VehicleRepository,
    VehicleStore,
};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub jwt: JwtConfig,
    pub routes: Arc<dyn RouteStore>,
    pub assignments: Arc<dyn AssignmentStore>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
    pub users: Arc<dyn UserStore>,
    pub vehicles: Arc<dyn VehicleStore>,
    pub rate_limit: RateLimitState,
}

impl AppState {
    /// Estado respaldado por PostgreSQL
    pub fn postgres(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            jwt: JwtConfig::from(&config),
            rate_limit: RateLimitState::new(&config),
            config: Arc::new(config),
            routes: Arc::new(RouteRepository::new(pool.clone())),
            assignments: Arc::new(AssignmentRepository::new(pool.clone())),
            subscriptions: Arc::new(SubscriptionRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            vehicles: Arc::new(VehicleRepository::new(pool)),
        }
    }

    /// Estado en memoria para desarrollo local y tests
    pub fn in_memory(config: EnvironmentConfig) -> Self {
        let store = Arc::new(InMemoryRepository::new());
        Self {
            jwt: JwtConfig::from(&config),
            rate_limit: RateLimitState::new(&config),
            config: Arc::new(config),
            routes: store.clone(),
            assignments: store.clone(),
            subscriptions: store.clone(),
            users: store.clone(),
            vehicles: store,
        }
    }

    /// Envolver el repositorio de rutas con el cache read-through
    pub fn with_route_cache(mut self, cache: Arc<dyn CacheOperations>) -> Self {
        let ttl = self.config.route_cache_ttl;
        self.routes = Arc::new(CachedRouteStore::new(self.routes, cache, ttl));
        self
    }
}
