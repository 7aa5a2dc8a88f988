//! Posting comments and replies, with mention side-table rows.

use db::models::{
    comment::{Comment, CommentImage, CreateComment},
    comment_context::CommentContext,
};
use thiserror::Error;
use tracing::{debug, error, info};
use utils::mentions;
use uuid::Uuid;

use super::feed_store::FeedStore;

#[derive(Debug, Error)]
pub enum CommentPostError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("comment has no content")]
    EmptyContent,
    #[error("comment not found")]
    ThreadNotFound,
    #[error("{0} not found in this project")]
    ContextNotFound(CommentContext),
}

/// Users mentioned in `content`. Tokens whose id is not a user id are skipped.
pub fn mentioned_user_ids(content: &str) -> Vec<Uuid> {
    mentions::decode(content)
        .into_iter()
        .filter_map(|m| match Uuid::parse_str(&m.user_id) {
            Ok(id) => Some(id),
            Err(_) => {
                debug!(user_id = %m.user_id, "Ignoring mention with malformed user id");
                None
            }
        })
        .collect()
}

pub struct CommentPostingService;

impl CommentPostingService {
    /// Store a comment, then record its mentions. The context entity must
    /// belong to `data.project_id`. The two writes are not atomic; a failed
    /// mention insert is logged and the comment is still returned.
    pub async fn post<S>(store: &S, data: CreateComment) -> Result<Comment, CommentPostError>
    where
        S: FeedStore + ?Sized,
    {
        if data.content.trim().is_empty() && data.images.is_empty() {
            return Err(CommentPostError::EmptyContent);
        }
        if data.context != CommentContext::Project {
            let owner = store.context_project(data.context).await?;
            if owner != Some(data.project_id) {
                return Err(CommentPostError::ContextNotFound(data.context));
            }
        }

        let comment = store.insert_comment(&data).await?;
        let mentioned = mentioned_user_ids(&comment.content);
        if !mentioned.is_empty() {
            if let Err(e) = store.insert_mentions(comment.id, &mentioned).await {
                error!(
                    comment_id = %comment.id,
                    error = %e,
                    "Failed to record comment mentions"
                );
            }
        }

        info!(
            comment_id = %comment.id,
            project_id = %data.project_id,
            context = %data.context,
            mentions = mentioned.len(),
            "Comment posted"
        );
        Ok(comment)
    }

    /// Reply in the thread rooted at `root_id`; the reply takes the root's
    /// context. Roots outside `project_id` are reported as not found.
    pub async fn reply<S>(
        store: &S,
        project_id: Uuid,
        root_id: Uuid,
        created_by: Uuid,
        content: String,
        images: Vec<CommentImage>,
    ) -> Result<Comment, CommentPostError>
    where
        S: FeedStore + ?Sized,
    {
        let root = store
            .comment(root_id)
            .await?
            .filter(|root| root.origin_project_id == Some(project_id))
            .ok_or(CommentPostError::ThreadNotFound)?;
        let data = CreateComment {
            project_id,
            context: root.context(),
            content,
            created_by,
            images,
        };
        Self::post(store, data).await
    }
}
