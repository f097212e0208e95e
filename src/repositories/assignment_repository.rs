use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::AssignmentStore;
use crate::models::assignment::{Assignment, AssignmentFilters, AssignmentStatus, CompletedStop};
use crate::utils::errors::{AppError, AppResult};

/// Fila de la tabla assignments
#[derive(Debug, sqlx::FromRow)]
struct AssignmentRow {
    id: Uuid,
    driver_id: Uuid,
    route_id: Uuid,
    vehicle_id: Uuid,
    scheduled_date: NaiveDate,
    scheduled_start_time: NaiveTime,
    current_stop_index: i32,
    completed_stops: Json<Vec<CompletedStop>>,
    status: AssignmentStatus,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AssignmentRow> for Assignment {
    fn from(row: AssignmentRow) -> Self {
        Self {
            id: row.id,
            driver_id: row.driver_id,
            route_id: row.route_id,
            vehicle_id: row.vehicle_id,
            scheduled_date: row.scheduled_date,
            scheduled_start_time: row.scheduled_start_time,
            current_stop_index: row.current_stop_index,
            completed_stops: row.completed_stops.0,
            status: row.status,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const INSERT_ASSIGNMENT: &str = r#"
    INSERT INTO assignments (
        id, driver_id, route_id, vehicle_id, scheduled_date, scheduled_start_time,
        current_stop_index, completed_stops, status, version, created_at, updated_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
    RETURNING *
"#;

pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn insert_query(assignment: &Assignment) -> QueryAs<'static, Postgres, AssignmentRow, PgArguments> {
    sqlx::query_as::<_, AssignmentRow>(INSERT_ASSIGNMENT)
        .bind(assignment.id)
        .bind(assignment.driver_id)
        .bind(assignment.route_id)
        .bind(assignment.vehicle_id)
        .bind(assignment.scheduled_date)
        .bind(assignment.scheduled_start_time)
        .bind(assignment.current_stop_index)
        .bind(Json(assignment.completed_stops.clone()))
        .bind(assignment.status)
        .bind(assignment.version)
        .bind(assignment.created_at)
        .bind(assignment.updated_at)
}

#[async_trait]
impl AssignmentStore for AssignmentRepository {
    async fn create(&self, assignment: &Assignment) -> AppResult<Assignment> {
        let row = insert_query(assignment)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Error creating assignment: {}", e)))?;

        Ok(row.into())
    }

    async fn create_many(&self, assignments: &[Assignment]) -> AppResult<Vec<Assignment>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let row = insert_query(assignment)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| AppError::Internal(format!("Error creating assignment: {}", e)))?;
            created.push(row.into());
        }
        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Assignment>> {
        let row = sqlx::query_as::<_, AssignmentRow>("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Assignment::from))
    }

    async fn list(&self, filters: &AssignmentFilters) -> AppResult<Vec<Assignment>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM assignments WHERE TRUE");

        if let Some(driver_id) = filters.driver_id {
            query.push(" AND driver_id = ").push_bind(driver_id);
        }
        if let Some(route_id) = filters.route_id {
            query.push(" AND route_id = ").push_bind(route_id);
        }
        if let Some(date) = filters.date {
            query.push(" AND scheduled_date = ").push_bind(date);
        }
        if let Some(status) = filters.status {
            query.push(" AND status = ").push_bind(status);
        }
        query.push(" ORDER BY scheduled_start_time ASC, created_at ASC");

        let rows = query
            .build_query_as::<AssignmentRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Assignment::from).collect())
    }

    async fn save_progress(&self, next: &Assignment, expected_version: i64) -> AppResult<Option<Assignment>> {
        // Solo una escritura puede ganar para una misma versión
        let row = sqlx::query_as::<_, AssignmentRow>(
            r#"
            UPDATE assignments
            SET current_stop_index = $3,
                completed_stops = $4,
                status = $5,
                version = version + 1,
                updated_at = $6
            WHERE id = $1 AND version = $2
            RETURNING *
            "#,
        )
        .bind(next.id)
        .bind(expected_version)
        .bind(next.current_stop_index)
        .bind(Json(next.completed_stops.clone()))
        .bind(next.status)
        .bind(next.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Assignment::from))
    }
}
