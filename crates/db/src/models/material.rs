use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use super::{push_id_list, task::EntityAssignee};

/// A material line item; each one is also tracked as a purchase order.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Material {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub assignee_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateMaterial {
    pub project_id: Uuid,
    pub name: String,
    pub assignee_id: Option<Uuid>,
}

impl Material {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateMaterial,
        material_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Material>(
            r#"INSERT INTO materials (id, project_id, name, assignee_id, created_at)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, project_id, name, assignee_id, created_at"#,
        )
        .bind(material_id)
        .bind(data.project_id)
        .bind(&data.name)
        .bind(data.assignee_id)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    /// Assignees of the given materials within a project, in one query.
    pub async fn find_assignees(
        pool: &SqlitePool,
        project_id: Uuid,
        material_ids: &[Uuid],
    ) -> Result<Vec<EntityAssignee>, sqlx::Error> {
        if material_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, assignee_id FROM materials WHERE project_id = ",
        );
        builder.push_bind(project_id);
        builder.push(" AND id");
        push_id_list(&mut builder, material_ids);
        builder
            .build_query_as::<EntityAssignee>()
            .fetch_all(pool)
            .await
    }
}
