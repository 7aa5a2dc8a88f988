use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use super::push_id_list;

/// A shape drawn on a floor plan.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct DrawingObject {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DrawingObject {
    pub async fn create(
        pool: &SqlitePool,
        plan_id: Uuid,
        name: Option<&str>,
        object_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, DrawingObject>(
            r#"INSERT INTO drawing_objects (id, plan_id, name, created_at)
               VALUES ($1, $2, $3, $4)
               RETURNING id, plan_id, name, created_at"#,
        )
        .bind(object_id)
        .bind(plan_id)
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
            "SELECT id, plan_id, name, created_at FROM drawing_objects WHERE id",
        );
        push_id_list(&mut builder, ids);
        builder.build_query_as::<DrawingObject>().fetch_all(pool).await
    }
}
