use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::RouteStore;
use crate::models::route_template::{GeoPoint, RouteStop, RouteTemplate, StoredStop};
use crate::services::route_stops::resolve_stops;
use crate::utils::errors::AppResult;

/// Fila de la tabla route_templates. Las rutas antiguas guardan sus paradas
/// en la columna `stoppages`; se normalizan aquí y en ningún otro sitio.
#[derive(Debug, sqlx::FromRow)]
struct RouteTemplateRow {
    id: Uuid,
    name: String,
    start_point: Json<GeoPoint>,
    end_point: Json<GeoPoint>,
    stops: Option<Json<Vec<StoredStop>>>,
    stoppages: Option<Json<Vec<StoredStop>>>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RouteTemplateRow> for RouteTemplate {
    fn from(row: RouteTemplateRow) -> Self {
        let stops = resolve_stops(
            row.stops.as_ref().map(|s| s.0.as_slice()),
            row.stoppages.as_ref().map(|s| s.0.as_slice()),
        );
        Self {
            id: row.id,
            name: row.name,
            start_point: row.start_point.0,
            end_point: row.end_point.0,
            stops,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn to_stored(stops: &[RouteStop]) -> Json<Vec<StoredStop>> {
    Json(
        stops
            .iter()
            .map(|stop| StoredStop {
                name: stop.name.clone(),
                lat: stop.lat,
                lng: stop.lng,
                order: Some(stop.order),
            })
            .collect(),
    )
}

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RouteStore for RouteRepository {
    async fn create(&self, route: &RouteTemplate) -> AppResult<RouteTemplate> {
        let row = sqlx::query_as::<_, RouteTemplateRow>(
            r#"
            INSERT INTO route_templates (id, name, start_point, end_point, stops, stoppages, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NULL, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(route.id)
        .bind(&route.name)
        .bind(Json(route.start_point.clone()))
        .bind(Json(route.end_point.clone()))
        .bind(to_stored(&route.stops))
        .bind(route.active)
        .bind(route.created_at)
        .bind(route.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RouteTemplate>> {
        let row = sqlx::query_as::<_, RouteTemplateRow>("SELECT * FROM route_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(RouteTemplate::from))
    }

    async fn list(&self, include_inactive: bool) -> AppResult<Vec<RouteTemplate>> {
        let rows = sqlx::query_as::<_, RouteTemplateRow>(
            "SELECT * FROM route_templates WHERE active OR $1 ORDER BY name ASC",
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RouteTemplate::from).collect())
    }

    async fn update(&self, route: &RouteTemplate) -> AppResult<Option<RouteTemplate>> {
        // Al reescribir una ruta antigua su lista pasa a la columna actual
        let row = sqlx::query_as::<_, RouteTemplateRow>(
            r#"
            UPDATE route_templates
            SET name = $2, start_point = $3, end_point = $4, stops = $5, stoppages = NULL,
                active = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(route.id)
        .bind(&route.name)
        .bind(Json(route.start_point.clone()))
        .bind(Json(route.end_point.clone()))
        .bind(to_stored(&route.stops))
        .bind(route.active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RouteTemplate::from))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<RouteTemplate>> {
        let row = sqlx::query_as::<_, RouteTemplateRow>(
            "UPDATE route_templates SET active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RouteTemplate::from))
    }
}
