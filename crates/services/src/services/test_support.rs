//! In-memory `FeedStore` that counts calls, for pipeline unit tests.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use db::models::{
    activity_log::{ActivityAction, ActivityEntityType, ActivityLogItem},
    comment::{Comment, CreateComment},
    comment_context::CommentContext,
    comment_mention::CommentMention,
    drawing_object::DrawingObject,
    floor_plan::FloorPlan,
    task::EntityAssignee,
};
use uuid::Uuid;

use super::feed_store::FeedStore;

/// Fixed clock: 2026-03-01 09:00 UTC plus `minutes`.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn comment(minutes: i64, content: &str) -> Comment {
    Comment {
        id: Uuid::new_v4(),
        content: content.to_string(),
        created_at: at(minutes),
        created_by: Uuid::new_v4(),
        ..Default::default()
    }
}

pub fn activity(project_id: Uuid, minutes: i64, action: ActivityAction) -> ActivityLogItem {
    ActivityLogItem {
        id: Uuid::new_v4(),
        project_id,
        actor_id: None,
        actor_name: None,
        action,
        entity_type: ActivityEntityType::Task,
        entity_id: Some(Uuid::new_v4()),
        entity_name: Some("Frame wall".to_string()),
        changes: serde_json::json!({}),
        created_at: at(minutes),
    }
}

pub fn mention(comment_id: Uuid, user_id: Uuid) -> CommentMention {
    CommentMention {
        id: Uuid::new_v4(),
        comment_id,
        mentioned_user_id: user_id,
        created_at: at(0),
    }
}

#[derive(Default)]
pub struct FakeStore {
    pub task_comments: Vec<Comment>,
    pub material_comments: Vec<Comment>,
    pub drawing_object_comments: Vec<Comment>,
    pub project_comments: Vec<Comment>,
    pub drawing_objects: Vec<DrawingObject>,
    pub floor_plans: Vec<FloorPlan>,
    pub activities: Vec<ActivityLogItem>,
    pub mentions: Vec<CommentMention>,
    pub task_assignees: Vec<EntityAssignee>,
    pub material_assignees: Vec<EntityAssignee>,
    /// Context entity id -> owning project.
    pub context_projects: HashMap<Uuid, Uuid>,
    /// Query name that should fail with a database error.
    pub fail_on: Option<&'static str>,
    pub inserted_mentions: Mutex<Vec<(Uuid, Vec<Uuid>)>>,
    pub(crate) calls: Mutex<HashMap<&'static str, usize>>,
}

impl FakeStore {
    pub fn calls(&self, query: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(query)
            .copied()
            .unwrap_or_default()
    }

    fn record(&self, query: &'static str) -> Result<(), sqlx::Error> {
        *self.calls.lock().unwrap().entry(query).or_default() += 1;
        if self.fail_on == Some(query) {
            return Err(sqlx::Error::Protocol(format!("{query} unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl FeedStore for FakeStore {
    async fn task_comments(&self, _project_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
        self.record("task_comments")?;
        Ok(self.task_comments.clone())
    }

    async fn material_comments(&self, _project_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
        self.record("material_comments")?;
        Ok(self.material_comments.clone())
    }

    async fn drawing_object_comments(&self) -> Result<Vec<Comment>, sqlx::Error> {
        self.record("drawing_object_comments")?;
        Ok(self.drawing_object_comments.clone())
    }

    async fn project_comments(&self, _project_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
        self.record("project_comments")?;
        Ok(self.project_comments.clone())
    }

    async fn comment(&self, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
        self.record("comment")?;
        Ok(self
            .task_comments
            .iter()
            .chain(&self.material_comments)
            .chain(&self.drawing_object_comments)
            .chain(&self.project_comments)
            .find(|c| c.id == comment_id)
            .cloned())
    }

    async fn context_project(&self, context: CommentContext) -> Result<Option<Uuid>, sqlx::Error> {
        self.record("context_project")?;
        Ok(context.id().and_then(|id| self.context_projects.get(&id).copied()))
    }

    async fn drawing_objects(&self, ids: &[Uuid]) -> Result<Vec<DrawingObject>, sqlx::Error> {
        self.record("drawing_objects")?;
        Ok(self
            .drawing_objects
            .iter()
            .filter(|o| ids.contains(&o.id))
            .cloned()
            .collect())
    }

    async fn floor_plans(&self, ids: &[Uuid]) -> Result<Vec<FloorPlan>, sqlx::Error> {
        self.record("floor_plans")?;
        Ok(self
            .floor_plans
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn activities(
        &self,
        project_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<ActivityLogItem>, sqlx::Error> {
        self.record("activities")?;
        let matching = self
            .activities
            .iter()
            .filter(|a| a.project_id == project_id)
            .cloned();
        Ok(match limit {
            Some(limit) => matching.take(limit as usize).collect(),
            None => matching.collect(),
        })
    }

    async fn mentions(&self, comment_ids: &[Uuid]) -> Result<Vec<CommentMention>, sqlx::Error> {
        self.record("mentions")?;
        Ok(self
            .mentions
            .iter()
            .filter(|m| comment_ids.contains(&m.comment_id))
            .cloned()
            .collect())
    }

    async fn task_assignees(
        &self,
        _project_id: Uuid,
        task_ids: &[Uuid],
    ) -> Result<Vec<EntityAssignee>, sqlx::Error> {
        self.record("task_assignees")?;
        Ok(self
            .task_assignees
            .iter()
            .filter(|a| task_ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn material_assignees(
        &self,
        _project_id: Uuid,
        material_ids: &[Uuid],
    ) -> Result<Vec<EntityAssignee>, sqlx::Error> {
        self.record("material_assignees")?;
        Ok(self
            .material_assignees
            .iter()
            .filter(|a| material_ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn insert_comment(&self, data: &CreateComment) -> Result<Comment, sqlx::Error> {
        self.record("insert_comment")?;
        let mut comment = comment(0, &data.content);
        comment.created_by = data.created_by;
        comment.images = data.images.clone();
        match data.context {
            CommentContext::Task(id) => comment.task_id = Some(id),
            CommentContext::Material(id) => comment.material_id = Some(id),
            CommentContext::Room(id) => {
                comment.entity_id = Some(id);
                comment.entity_type = Some("room".to_string());
                comment.project_id = Some(data.project_id);
            }
            CommentContext::DrawingObject(id) => comment.drawing_object_id = Some(id),
            CommentContext::Project => comment.project_id = Some(data.project_id),
        }
        comment.origin_project_id = Some(data.project_id);
        Ok(comment)
    }

    async fn insert_mentions(
        &self,
        comment_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error> {
        self.record("insert_mentions")?;
        self.inserted_mentions
            .lock()
            .unwrap()
            .push((comment_id, user_ids.to_vec()));
        Ok(user_ids.len() as u64)
    }
}
