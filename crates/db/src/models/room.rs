use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Entity type stored on comments attached to a room.
pub const ROOM_ENTITY_TYPE: &str = "room";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Room {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub async fn create(
        pool: &SqlitePool,
        project_id: Uuid,
        name: &str,
        room_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Room>(
            r#"INSERT INTO rooms (id, project_id, name, created_at)
               VALUES ($1, $2, $3, $4)
               RETURNING id, project_id, name, created_at"#,
        )
        .bind(room_id)
        .bind(project_id)
        .bind(name)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }
}
