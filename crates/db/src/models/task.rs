use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use super::push_id_list;

#[derive(
    Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Blocked,
    Done,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid, // Foreign key to Project
    pub title: String,
    pub status: TaskStatus,
    pub assignee_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateTask {
    pub project_id: Uuid,
    pub title: String,
    pub status: Option<TaskStatus>,
    pub assignee_id: Option<Uuid>,
}

impl CreateTask {
    pub fn from_title(project_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            status: Some(TaskStatus::Todo),
            assignee_id: None,
        }
    }

    pub fn assigned_to(mut self, assignee_id: Uuid) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }
}

/// Assignee of a task or material, as returned by batched lookups.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct EntityAssignee {
    pub id: Uuid,
    pub assignee_id: Option<Uuid>,
}

impl Task {
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"SELECT id, project_id, title, status, assignee_id, created_at, updated_at
               FROM tasks
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateTask,
        task_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let status = data.status.clone().unwrap_or_default();
        let now = Utc::now();
        sqlx::query_as::<_, Task>(
            r#"INSERT INTO tasks (id, project_id, title, status, assignee_id, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id, project_id, title, status, assignee_id, created_at, updated_at"#,
        )
        .bind(task_id)
        .bind(data.project_id)
        .bind(&data.title)
        .bind(status)
        .bind(data.assignee_id)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Assignees of the given tasks within a project, in one query.
    pub async fn find_assignees(
        pool: &SqlitePool,
        project_id: Uuid,
        task_ids: &[Uuid],
    ) -> Result<Vec<EntityAssignee>, sqlx::Error> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder =
            QueryBuilder::<Sqlite>::new("SELECT id, assignee_id FROM tasks WHERE project_id = ");
        builder.push_bind(project_id);
        builder.push(" AND id");
        push_id_list(&mut builder, task_ids);
        builder
            .build_query_as::<EntityAssignee>()
            .fetch_all(pool)
            .await
    }
}
