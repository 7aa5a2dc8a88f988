//! Which entity a comment is about.
//!
//! Comments store their context as a set of nullable foreign keys. This module
//! turns that flat record into a [`CommentContext`] once, checking the keys in
//! a fixed priority order so every row classifies the same way.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use super::comment::Comment;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContextKind {
    Task,
    Material,
    Room,
    DrawingObject,
    Project,
}

/// The logical entity a comment is attached to. `Project` carries no id: a
/// feed is always scoped to one project, so all project-level comments share
/// one thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Default)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum CommentContext {
    Task(Uuid),
    Material(Uuid),
    Room(Uuid),
    DrawingObject(Uuid),
    #[default]
    Project,
}

impl CommentContext {
    pub fn kind(&self) -> ContextKind {
        match self {
            Self::Task(_) => ContextKind::Task,
            Self::Material(_) => ContextKind::Material,
            Self::Room(_) => ContextKind::Room,
            Self::DrawingObject(_) => ContextKind::DrawingObject,
            Self::Project => ContextKind::Project,
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        match self {
            Self::Task(id) | Self::Material(id) | Self::Room(id) | Self::DrawingObject(id) => {
                Some(*id)
            }
            Self::Project => None,
        }
    }
}

impl CommentContext {
    /// Project owning the entity this context points at, or `None` when the
    /// entity does not exist. `Project` points at no entity and yields `None`.
    pub async fn owning_project(&self, pool: &SqlitePool) -> Result<Option<Uuid>, sqlx::Error> {
        let Some(id) = self.id() else {
            return Ok(None);
        };
        let query = match self.kind() {
            ContextKind::Task => "SELECT project_id FROM tasks WHERE id = $1",
            ContextKind::Material => "SELECT project_id FROM materials WHERE id = $1",
            ContextKind::Room => "SELECT project_id FROM rooms WHERE id = $1",
            ContextKind::DrawingObject => {
                r#"SELECT fp.project_id
                   FROM drawing_objects d
                   JOIN floor_plans fp ON fp.id = d.plan_id
                   WHERE d.id = $1"#
            }
            ContextKind::Project => return Ok(None),
        };
        sqlx::query_scalar::<_, Uuid>(query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// Thread key: `<kind>:<id>`, or `project` for the project-level bucket.
impl fmt::Display for CommentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{}:{}", self.kind(), id),
            None => f.write_str("project"),
        }
    }
}

impl Comment {
    /// Classify by foreign key, in priority order:
    /// task > material > entity (room) > drawing object > project.
    pub fn context(&self) -> CommentContext {
        if let Some(id) = self.task_id {
            CommentContext::Task(id)
        } else if let Some(id) = self.material_id {
            CommentContext::Material(id)
        } else if let Some(id) = self.entity_id {
            CommentContext::Room(id)
        } else if let Some(id) = self.drawing_object_id {
            CommentContext::DrawingObject(id)
        } else {
            CommentContext::Project
        }
    }

    /// Display name of the classified context; empty for project-level
    /// comments or when the name was not joined in.
    pub fn context_label(&self) -> &str {
        let name = match self.context() {
            CommentContext::Task(_) => &self.task_title,
            CommentContext::Material(_) => &self.material_name,
            CommentContext::Room(_) => &self.entity_name,
            CommentContext::DrawingObject(_) => &self.drawing_object_name,
            CommentContext::Project => return "",
        };
        name.as_deref().unwrap_or("")
    }
}

pub fn classify(comment: &Comment) -> ContextKind {
    comment.context().kind()
}

pub fn label(comment: &Comment) -> &str {
    comment.context_label()
}
