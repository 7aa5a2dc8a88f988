use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type, types::Json};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Lifecycle event recorded in the activity log
#[derive(Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display)]
#[sqlx(type_name = "activity_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityAction {
    Created,
    StatusChanged,
    Assigned,
    Deleted,
    MemberAdded,
    MemberRemoved,
}

/// Kind of entity an activity entry is about
#[derive(Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display)]
#[sqlx(type_name = "activity_entity_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityEntityType {
    Task,
    Room,
    Material,
    Team,
    FloorPlan,
}

/// Immutable audit record. Rows are written by mutation triggers; the feed
/// only reads them.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ActivityLogItem {
    pub id: Uuid,
    pub project_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub actor_name: Option<String>,
    pub action: ActivityAction,
    pub entity_type: ActivityEntityType,
    pub entity_id: Option<Uuid>,
    pub entity_name: Option<String>, // Snapshot of the name when the event happened
    #[sqlx(json)]
    pub changes: serde_json::Value, // e.g. {"old": "todo", "new": "done"}
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateActivityLog {
    pub project_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: ActivityAction,
    pub entity_type: ActivityEntityType,
    pub entity_id: Option<Uuid>,
    pub entity_name: Option<String>,
    pub changes: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl ActivityLogItem {
    pub async fn create(pool: &SqlitePool, data: &CreateActivityLog) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"INSERT INTO activity_log (id, project_id, actor_id, action, entity_type, entity_id,
                   entity_name, changes, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"#,
        )
        .bind(id)
        .bind(data.project_id)
        .bind(data.actor_id)
        .bind(data.action)
        .bind(data.entity_type)
        .bind(data.entity_id)
        .bind(&data.entity_name)
        .bind(Json(&data.changes))
        .bind(data.created_at)
        .execute(pool)
        .await?;
        Ok(id)
    }

    /// Newest first. `limit` of `None` returns every entry.
    pub async fn find_by_project_id(
        pool: &SqlitePool,
        project_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ActivityLogItem>(
            r#"SELECT
                a.id, a.project_id, a.actor_id, p.display_name AS actor_name, a.action,
                a.entity_type, a.entity_id, a.entity_name, a.changes, a.created_at
            FROM activity_log a
            LEFT JOIN profiles p ON p.id = a.actor_id
            WHERE a.project_id = $1
            ORDER BY a.created_at DESC
            LIMIT $2"#,
        )
        .bind(project_id)
        .bind(limit.unwrap_or(-1))
        .fetch_all(pool)
        .await
    }
}
