use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use shuttle_rides::cache::{CacheConfig, RedisClient};
use shuttle_rides::config::database::DatabaseConfig;
use shuttle_rides::config::{EnvironmentConfig, StorageBackend};
use shuttle_rides::database::connect_and_migrate;
use shuttle_rides::routes::create_app_router;
use shuttle_rides::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚐 Shuttle Rides - API de suscripciones y seguimiento de rutas");
    info!("==============================================================");

    let config = EnvironmentConfig::from_env()?;
    let cache_config = CacheConfig::from_environment(&config);

    let mut state = match config.storage_backend {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_environment(&config)
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL requerido para el backend postgres"))?;
            let pool = match connect_and_migrate(&db_config).await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {:#}", e);
                    return Err(e);
                }
            };
            AppState::postgres(pool, config)
        }
        StorageBackend::Memory => {
            if config.is_production() {
                warn!("⚠️ Backend en memoria en producción: los datos se pierden al reiniciar");
            } else {
                info!("🧪 Usando almacenamiento en memoria");
            }
            AppState::in_memory(config)
        }
    };

    // Redis es opcional: sin él las rutas se leen siempre del repositorio
    if let Some(cache_config) = cache_config {
        match RedisClient::new(&cache_config).await {
            Ok(client) => {
                info!("✅ Redis conectado, cache de rutas activo");
                state = state.with_route_cache(Arc::new(client));
            }
            Err(e) => warn!("⚠️ Redis no disponible, se continúa sin cache: {:#}", e),
        }
    }

    let addr: SocketAddr = state.config.server_url().parse()?;
    let environment = state.config.environment.clone();
    let app = create_app_router(state);

    info!("🌐 Servidor en http://{} ({})", addr, environment);
    info!("📋 Endpoints:");
    info!("   GET  /health");
    info!("   POST /api/auth/register | /api/auth/login");
    info!("   GET  /api/auth/me");
    info!("   *    /api/routes, /api/vehicles, /api/drivers, /api/assignments");
    info!("   *    /api/driver/assignments/:id/(next-stop|status|progress|reset)");
    info!("   *    /api/subscriptions, /api/rides/:id/progress");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor detenido");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
