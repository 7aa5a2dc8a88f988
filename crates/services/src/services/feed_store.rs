//! Read/write seam between the feed pipeline and the backing store.

use async_trait::async_trait;
use db::{
    DBService,
    models::{
        activity_log::ActivityLogItem,
        comment::{Comment, CreateComment},
        comment_context::CommentContext,
        comment_mention::CommentMention,
        drawing_object::DrawingObject,
        floor_plan::FloorPlan,
        material::Material,
        task::{EntityAssignee, Task},
    },
};
use uuid::Uuid;

/// Queries the feed needs from the store. Every `&[Uuid]` method is a single
/// batched `IN (...)` lookup.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Comments on tasks belonging to the project.
    async fn task_comments(&self, project_id: Uuid) -> Result<Vec<Comment>, sqlx::Error>;

    /// Comments on materials belonging to the project.
    async fn material_comments(&self, project_id: Uuid) -> Result<Vec<Comment>, sqlx::Error>;

    /// Drawing-object comments from every project.
    async fn drawing_object_comments(&self) -> Result<Vec<Comment>, sqlx::Error>;

    /// Comments with a direct project reference (general and room comments).
    async fn project_comments(&self, project_id: Uuid) -> Result<Vec<Comment>, sqlx::Error>;

    async fn comment(&self, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error>;

    /// Project owning the context's entity; `None` if the entity is missing.
    async fn context_project(&self, context: CommentContext) -> Result<Option<Uuid>, sqlx::Error>;

    async fn drawing_objects(&self, ids: &[Uuid]) -> Result<Vec<DrawingObject>, sqlx::Error>;

    async fn floor_plans(&self, ids: &[Uuid]) -> Result<Vec<FloorPlan>, sqlx::Error>;

    async fn activities(
        &self,
        project_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<ActivityLogItem>, sqlx::Error>;

    async fn mentions(&self, comment_ids: &[Uuid]) -> Result<Vec<CommentMention>, sqlx::Error>;

    async fn task_assignees(
        &self,
        project_id: Uuid,
        task_ids: &[Uuid],
    ) -> Result<Vec<EntityAssignee>, sqlx::Error>;

    async fn material_assignees(
        &self,
        project_id: Uuid,
        material_ids: &[Uuid],
    ) -> Result<Vec<EntityAssignee>, sqlx::Error>;

    async fn insert_comment(&self, data: &CreateComment) -> Result<Comment, sqlx::Error>;

    async fn insert_mentions(&self, comment_id: Uuid, user_ids: &[Uuid])
        -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl FeedStore for DBService {
    async fn task_comments(&self, project_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
        Comment::find_for_project_tasks(&self.pool, project_id).await
    }

    async fn material_comments(&self, project_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
        Comment::find_for_project_materials(&self.pool, project_id).await
    }

    async fn drawing_object_comments(&self) -> Result<Vec<Comment>, sqlx::Error> {
        Comment::find_on_drawing_objects(&self.pool).await
    }

    async fn project_comments(&self, project_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
        Comment::find_for_project(&self.pool, project_id).await
    }

    async fn comment(&self, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
        Comment::find_by_id(&self.pool, comment_id).await
    }

    async fn context_project(&self, context: CommentContext) -> Result<Option<Uuid>, sqlx::Error> {
        context.owning_project(&self.pool).await
    }

    async fn drawing_objects(&self, ids: &[Uuid]) -> Result<Vec<DrawingObject>, sqlx::Error> {
        DrawingObject::find_by_ids(&self.pool, ids).await
    }

    async fn floor_plans(&self, ids: &[Uuid]) -> Result<Vec<FloorPlan>, sqlx::Error> {
        FloorPlan::find_by_ids(&self.pool, ids).await
    }

    async fn activities(
        &self,
        project_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<ActivityLogItem>, sqlx::Error> {
        ActivityLogItem::find_by_project_id(&self.pool, project_id, limit).await
    }

    async fn mentions(&self, comment_ids: &[Uuid]) -> Result<Vec<CommentMention>, sqlx::Error> {
        CommentMention::find_by_comment_ids(&self.pool, comment_ids).await
    }

    async fn task_assignees(
        &self,
        project_id: Uuid,
        task_ids: &[Uuid],
    ) -> Result<Vec<EntityAssignee>, sqlx::Error> {
        Task::find_assignees(&self.pool, project_id, task_ids).await
    }

    async fn material_assignees(
        &self,
        project_id: Uuid,
        material_ids: &[Uuid],
    ) -> Result<Vec<EntityAssignee>, sqlx::Error> {
        Material::find_assignees(&self.pool, project_id, material_ids).await
    }

    async fn insert_comment(&self, data: &CreateComment) -> Result<Comment, sqlx::Error> {
        Comment::create(&self.pool, data, Uuid::new_v4()).await
    }

    async fn insert_mentions(
        &self,
        comment_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error> {
        CommentMention::create_many(&self.pool, comment_id, user_ids).await
    }
}
