use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use super::push_id_list;

/// An imported floor plan. Drawing objects hang off a plan, not a project.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct FloorPlan {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl FloorPlan {
    pub async fn create(
        pool: &SqlitePool,
        project_id: Uuid,
        name: &str,
        plan_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, FloorPlan>(
            r#"INSERT INTO floor_plans (id, project_id, name, created_at)
               VALUES ($1, $2, $3, $4)
               RETURNING id, project_id, name, created_at"#,
        )
        .bind(plan_id)
        .bind(project_id)
        .bind(name)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_ids(pool: &SqlitePool, ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, project_id, name, created_at FROM floor_plans WHERE id",
        );
        push_id_list(&mut builder, ids);
        builder.build_query_as::<FloorPlan>().fetch_all(pool).await
    }
}
