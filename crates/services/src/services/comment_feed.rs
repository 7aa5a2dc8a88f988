//! Project-wide comment aggregation.
//!
//! A project's comments live under four different parents. Each parent kind is
//! fetched with its own query and the results are concatenated. The queries
//! are mutually exclusive by construction, so no de-duplication happens here.

use std::collections::{BTreeSet, HashMap};

use db::models::comment::Comment;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::feed_store::FeedStore;

#[derive(Debug, Error)]
pub enum CommentFeedError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub struct CommentFeedService;

impl CommentFeedService {
    /// Every comment visible in the project, newest first. Any failed query
    /// fails the whole call; a partial feed is never returned.
    pub async fn aggregate<S>(store: &S, project_id: Uuid) -> Result<Vec<Comment>, CommentFeedError>
    where
        S: FeedStore + ?Sized,
    {
        let (task_comments, material_comments, drawing_comments, project_comments) =
            tokio::try_join!(
                store.task_comments(project_id),
                store.material_comments(project_id),
                Self::drawing_object_comments(store, project_id),
                store.project_comments(project_id),
            )?;

        debug!(
            project_id = %project_id,
            tasks = task_comments.len(),
            materials = material_comments.len(),
            drawing_objects = drawing_comments.len(),
            project = project_comments.len(),
            "Aggregated project comments"
        );

        let mut comments: Vec<Comment> = task_comments
            .into_iter()
            .chain(material_comments)
            .chain(project_comments)
            .map(|mut comment| {
                comment.origin_project_id = Some(project_id);
                comment
            })
            .chain(drawing_comments)
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    /// Drawing-object comments can't be filtered by project in the query:
    /// the project is reached through object -> floor plan -> project. Fetch
    /// them all, resolve owners with two batched lookups, and keep the ones
    /// owned by `project_id` with the object name filled in.
    async fn drawing_object_comments<S>(
        store: &S,
        project_id: Uuid,
    ) -> Result<Vec<Comment>, sqlx::Error>
    where
        S: FeedStore + ?Sized,
    {
        let comments = store.drawing_object_comments().await?;
        if comments.is_empty() {
            return Ok(comments);
        }

        let object_ids: Vec<Uuid> = comments
            .iter()
            .filter_map(|c| c.drawing_object_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let objects = store.drawing_objects(&object_ids).await?;

        let plan_ids: Vec<Uuid> = objects
            .iter()
            .map(|o| o.plan_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let plans = store.floor_plans(&plan_ids).await?;
        let plan_projects: HashMap<Uuid, Uuid> =
            plans.into_iter().map(|p| (p.id, p.project_id)).collect();

        // object id -> display name, for objects owned by this project
        let owned: HashMap<Uuid, Option<String>> = objects
            .into_iter()
            .filter(|o| plan_projects.get(&o.plan_id) == Some(&project_id))
            .map(|o| (o.id, o.name))
            .collect();

        Ok(comments
            .into_iter()
            .filter_map(|mut comment| {
                let name = owned.get(&comment.drawing_object_id?)?;
                comment.drawing_object_name = name.clone();
                comment.origin_project_id = Some(project_id);
                Some(comment)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use db::models::{drawing_object::DrawingObject, floor_plan::FloorPlan};

    use super::*;
    use crate::services::test_support::{FakeStore, comment};

    fn plan(id: Uuid, project_id: Uuid) -> FloorPlan {
        FloorPlan {
            id,
            project_id,
            name: "Ground floor".to_string(),
            created_at: Utc::now(),
        }
    }

    fn shape(id: Uuid, plan_id: Uuid, name: &str) -> DrawingObject {
        DrawingObject {
            id,
            plan_id,
            name: Some(name.to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_aggregate_merges_and_sorts_newest_first() {
        let project = Uuid::new_v4();
        let task = Uuid::new_v4();
        let c1 = Comment {
            task_id: Some(task),
            ..comment(0, "looks good")
        };
        let c2 = Comment {
            task_id: Some(task),
            ..comment(5, "@[Alice](5f0c3a1e-6a0b-4b8e-9d6a-2f1e0c9b7a11) please review")
        };
        let c3 = Comment {
            project_id: Some(project),
            ..comment(10, "general note")
        };
        let store = FakeStore {
            task_comments: vec![c1.clone(), c2.clone()],
            project_comments: vec![c3.clone()],
            ..Default::default()
        };

        let comments = CommentFeedService::aggregate(&store, project).await.unwrap();
        let ids: Vec<_> = comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![c3.id, c2.id, c1.id]);
        assert!(
            comments
                .iter()
                .all(|c| c.origin_project_id == Some(project))
        );
    }

    #[tokio::test]
    async fn test_drawing_object_comments_resolve_through_plan() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let (plan_id, shape_id) = (Uuid::new_v4(), Uuid::new_v4());
        let d1 = Comment {
            drawing_object_id: Some(shape_id),
            ..comment(0, "move this door")
        };
        let store = FakeStore {
            drawing_object_comments: vec![d1.clone()],
            drawing_objects: vec![shape(shape_id, plan_id, "Door D2")],
            floor_plans: vec![plan(plan_id, p2)],
            ..Default::default()
        };

        let elsewhere = CommentFeedService::aggregate(&store, p1).await.unwrap();
        assert!(elsewhere.is_empty());

        let owned = CommentFeedService::aggregate(&store, p2).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, d1.id);
        assert_eq!(owned[0].context_label(), "Door D2");
        assert_eq!(owned[0].origin_project_id, Some(p2));
    }

    #[tokio::test]
    async fn test_drawing_object_lookups_are_batched() {
        let project = Uuid::new_v4();
        let plan_id = Uuid::new_v4();
        let shapes: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let comments = (0..12)
            .map(|i| Comment {
                drawing_object_id: Some(shapes[i % 3]),
                ..comment(i as i64, "note")
            })
            .collect();
        let store = FakeStore {
            drawing_object_comments: comments,
            drawing_objects: shapes.iter().map(|id| shape(*id, plan_id, "W")).collect(),
            floor_plans: vec![plan(plan_id, project)],
            ..Default::default()
        };

        let found = CommentFeedService::aggregate(&store, project).await.unwrap();
        assert_eq!(found.len(), 12);
        assert_eq!(store.calls("drawing_objects"), 1);
        assert_eq!(store.calls("floor_plans"), 1);
    }

    #[tokio::test]
    async fn test_no_drawing_object_comments_skips_lookups() {
        let store = FakeStore::default();
        let found = CommentFeedService::aggregate(&store, Uuid::new_v4())
            .await
            .unwrap();
        assert!(found.is_empty());
        assert_eq!(store.calls("drawing_objects"), 0);
        assert_eq!(store.calls("floor_plans"), 0);
    }

    #[tokio::test]
    async fn test_any_failed_query_fails_the_aggregate() {
        for query in [
            "task_comments",
            "material_comments",
            "drawing_object_comments",
            "project_comments",
        ] {
            let store = FakeStore {
                project_comments: vec![comment(0, "general note")],
                fail_on: Some(query),
                ..Default::default()
            };
            let result = CommentFeedService::aggregate(&store, Uuid::new_v4()).await;
            assert!(
                matches!(result, Err(CommentFeedError::Database(_))),
                "{query} failure should surface"
            );
        }
    }

    #[tokio::test]
    async fn test_failed_owner_lookup_fails_the_aggregate() {
        let store = FakeStore {
            drawing_object_comments: vec![Comment {
                drawing_object_id: Some(Uuid::new_v4()),
                ..comment(0, "note")
            }],
            fail_on: Some("floor_plans"),
            ..Default::default()
        };
        assert!(
            CommentFeedService::aggregate(&store, Uuid::new_v4())
                .await
                .is_err()
        );
    }
}
