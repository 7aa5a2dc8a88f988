//! "Relevant to me" filtering of comment threads.
//!
//! A thread is kept for a user when any of its comments was written by them,
//! mentions them (either in the mention table or in the content itself), or
//! sits on a task or material assigned to them. Mention rows and assignees are
//! resolved with one batched lookup each, however many comments there are.

use std::collections::{BTreeSet, HashSet};

use db::models::comment::Comment;
use thiserror::Error;
use tracing::debug;
use utils::mentions;
use uuid::Uuid;

use super::{comment_threads::ThreadGroup, feed_store::FeedStore};

#[derive(Debug, Error)]
pub enum AudienceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// What a user is attached to, among the comments being filtered.
#[derive(Debug, Default)]
struct Involvement {
    mentioned_in: HashSet<Uuid>,
    assigned_tasks: HashSet<Uuid>,
    assigned_materials: HashSet<Uuid>,
}

impl Involvement {
    fn covers(&self, comment: &Comment, user_id: Uuid) -> bool {
        comment.created_by == user_id
            || self.mentioned_in.contains(&comment.id)
            || mentions_in_content(comment, user_id)
            || comment
                .task_id
                .is_some_and(|id| self.assigned_tasks.contains(&id))
            || comment
                .material_id
                .is_some_and(|id| self.assigned_materials.contains(&id))
    }
}

fn mentions_in_content(comment: &Comment, user_id: Uuid) -> bool {
    mentions::decode(&comment.content)
        .iter()
        .any(|m| Uuid::parse_str(&m.user_id).is_ok_and(|id| id == user_id))
}

fn distinct(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    ids.collect::<BTreeSet<_>>().into_iter().collect()
}

pub struct AudienceService;

impl AudienceService {
    /// Keep the threads relevant to `user_id`, preserving their order.
    pub async fn filter_for_user<S>(
        store: &S,
        groups: Vec<ThreadGroup>,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Vec<ThreadGroup>, AudienceError>
    where
        S: FeedStore + ?Sized,
    {
        if groups.is_empty() {
            return Ok(groups);
        }

        let comments = || groups.iter().flat_map(|g| g.comments.iter());
        let comment_ids = distinct(comments().map(|c| c.id));
        let task_ids = distinct(comments().filter_map(|c| c.task_id));
        let material_ids = distinct(comments().filter_map(|c| c.material_id));

        let tasks = async {
            if task_ids.is_empty() {
                Ok(Vec::new())
            } else {
                store.task_assignees(project_id, &task_ids).await
            }
        };
        let materials = async {
            if material_ids.is_empty() {
                Ok(Vec::new())
            } else {
                store.material_assignees(project_id, &material_ids).await
            }
        };
        let (mention_rows, task_assignees, material_assignees) =
            tokio::try_join!(store.mentions(&comment_ids), tasks, materials)?;

        let involvement = Involvement {
            mentioned_in: mention_rows
                .into_iter()
                .filter(|m| m.mentioned_user_id == user_id)
                .map(|m| m.comment_id)
                .collect(),
            assigned_tasks: task_assignees
                .into_iter()
                .filter(|a| a.assignee_id == Some(user_id))
                .map(|a| a.id)
                .collect(),
            assigned_materials: material_assignees
                .into_iter()
                .filter(|a| a.assignee_id == Some(user_id))
                .map(|a| a.id)
                .collect(),
        };

        let total = groups.len();
        let kept: Vec<ThreadGroup> = groups
            .into_iter()
            .filter(|g| g.comments.iter().any(|c| involvement.covers(c, user_id)))
            .collect();
        debug!(
            project_id = %project_id,
            user_id = %user_id,
            kept = kept.len(),
            total,
            "Filtered threads for user"
        );
        Ok(kept)
    }
}
