use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json};
use ts_rs::TS;
use uuid::Uuid;

use super::{comment_context::CommentContext, room::ROOM_ENTITY_TYPE};

/// Base comment columns, with the author's display name joined from `profiles p`.
macro_rules! comment_columns {
    () => {
        r#"c.id, c.content, c.created_at, c.created_by, p.display_name AS author_name, c.images,
  c.task_id, c.material_id, c.entity_id, c.entity_type, c.drawing_object_id, c.project_id"#
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct CommentImage {
    pub id: Uuid,
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize, TS)]
pub struct Comment {
    pub id: Uuid,
    pub content: String, // May embed @[Name](user-id) mention tokens
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub author_name: Option<String>,
    #[sqlx(json)]
    pub images: Vec<CommentImage>,

    pub task_id: Option<Uuid>,
    pub material_id: Option<Uuid>,
    pub entity_id: Option<Uuid>,
    pub entity_type: Option<String>,
    pub drawing_object_id: Option<Uuid>,
    pub project_id: Option<Uuid>,

    // Display names of the referenced context, filled by joins or enrichment
    pub task_title: Option<String>,
    pub material_name: Option<String>,
    pub entity_name: Option<String>,
    pub drawing_object_name: Option<String>,
    /// Project the comment was fetched for.
    pub origin_project_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateComment {
    pub project_id: Uuid,
    pub context: CommentContext,
    pub content: String,
    pub created_by: Uuid,
    pub images: Vec<CommentImage>,
}

/// Foreign-key columns written for a context.
#[derive(Debug, Default, PartialEq)]
struct ContextColumns {
    task_id: Option<Uuid>,
    material_id: Option<Uuid>,
    entity_id: Option<Uuid>,
    entity_type: Option<&'static str>,
    drawing_object_id: Option<Uuid>,
    project_id: Option<Uuid>,
}

impl ContextColumns {
    fn new(context: CommentContext, project_id: Uuid) -> Self {
        match context {
            CommentContext::Task(id) => Self {
                task_id: Some(id),
                ..Default::default()
            },
            CommentContext::Material(id) => Self {
                material_id: Some(id),
                ..Default::default()
            },
            // Room comments keep the project reference so project-scoped reads find them
            CommentContext::Room(id) => Self {
                entity_id: Some(id),
                entity_type: Some(ROOM_ENTITY_TYPE),
                project_id: Some(project_id),
                ..Default::default()
            },
            CommentContext::DrawingObject(id) => Self {
                drawing_object_id: Some(id),
                ..Default::default()
            },
            CommentContext::Project => Self {
                project_id: Some(project_id),
                ..Default::default()
            },
        }
    }
}

impl Comment {
    /// Comments on the project's tasks, with the task title joined in.
    pub async fn find_for_project_tasks(
        pool: &SqlitePool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(concat!(
            "SELECT ",
            comment_columns!(),
            r#",
  t.title AS task_title, NULL AS material_name, NULL AS entity_name,
  NULL AS drawing_object_name, t.project_id AS origin_project_id
FROM comments c
JOIN tasks t ON t.id = c.task_id
LEFT JOIN profiles p ON p.id = c.created_by
WHERE t.project_id = $1
ORDER BY c.created_at DESC"#
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Comments on the project's materials (purchase orders).
    pub async fn find_for_project_materials(
        pool: &SqlitePool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(concat!(
            "SELECT ",
            comment_columns!(),
            r#",
  NULL AS task_title, m.name AS material_name, NULL AS entity_name,
  NULL AS drawing_object_name, m.project_id AS origin_project_id
FROM comments c
JOIN materials m ON m.id = c.material_id
LEFT JOIN profiles p ON p.id = c.created_by
WHERE m.project_id = $1
  AND c.task_id IS NULL
ORDER BY c.created_at DESC"#
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Every drawing-object comment, across all projects. The owning project
    /// sits two hops away (object -> plan -> project) and is resolved by the
    /// caller.
    pub async fn find_on_drawing_objects(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(concat!(
            "SELECT ",
            comment_columns!(),
            r#",
  NULL AS task_title, NULL AS material_name, NULL AS entity_name,
  NULL AS drawing_object_name, NULL AS origin_project_id
FROM comments c
LEFT JOIN profiles p ON p.id = c.created_by
WHERE c.drawing_object_id IS NOT NULL
  AND c.task_id IS NULL
  AND c.material_id IS NULL
ORDER BY c.created_at DESC"#
        ))
        .fetch_all(pool)
        .await
    }

    /// Comments referencing the project directly: general comments and room
    /// comments.
    pub async fn find_for_project(
        pool: &SqlitePool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(concat!(
            "SELECT ",
            comment_columns!(),
            r#",
  NULL AS task_title, NULL AS material_name, r.name AS entity_name,
  NULL AS drawing_object_name, c.project_id AS origin_project_id
FROM comments c
LEFT JOIN rooms r ON r.id = c.entity_id
LEFT JOIN profiles p ON p.id = c.created_by
WHERE c.project_id = $1
  AND c.task_id IS NULL
  AND c.material_id IS NULL
  AND c.drawing_object_id IS NULL
ORDER BY c.created_at DESC"#
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(concat!(
            "SELECT ",
            comment_columns!(),
            r#",
  t.title AS task_title, m.name AS material_name, r.name AS entity_name,
  d.name AS drawing_object_name,
  COALESCE(t.project_id, m.project_id, fp.project_id, c.project_id) AS origin_project_id
FROM comments c
LEFT JOIN tasks t ON t.id = c.task_id
LEFT JOIN materials m ON m.id = c.material_id
LEFT JOIN rooms r ON r.id = c.entity_id
LEFT JOIN drawing_objects d ON d.id = c.drawing_object_id
LEFT JOIN floor_plans fp ON fp.id = d.plan_id
LEFT JOIN profiles p ON p.id = c.created_by
WHERE c.id = $1"#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateComment,
        comment_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let columns = ContextColumns::new(data.context, data.project_id);
        sqlx::query(
            r#"INSERT INTO comments (id, content, created_by, images, task_id, material_id,
                   entity_id, entity_type, drawing_object_id, project_id, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
        )
        .bind(comment_id)
        .bind(&data.content)
        .bind(data.created_by)
        .bind(Json(&data.images))
        .bind(columns.task_id)
        .bind(columns.material_id)
        .bind(columns.entity_id)
        .bind(columns.entity_type)
        .bind(columns.drawing_object_id)
        .bind(columns.project_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Self::find_by_id(pool, comment_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }
}
