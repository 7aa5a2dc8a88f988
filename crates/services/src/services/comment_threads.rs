//! Grouping of a project's comments into one thread per context.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use db::models::{
    comment::Comment,
    comment_context::{CommentContext, ContextKind},
};
use serde::Serialize;
use ts_rs::TS;

/// All comments about one context, oldest first.
#[derive(Debug, Clone, Serialize, TS)]
pub struct ThreadGroup {
    pub key: String,
    pub context: CommentContext,
    pub context_type: ContextKind,
    pub label: String,
    /// Earliest comment; replies copy its context so they land in this thread.
    pub root: Comment,
    pub comments: Vec<Comment>,
}

impl ThreadGroup {
    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.comments
            .last()
            .map(|c| c.created_at)
            .unwrap_or(self.root.created_at)
    }
}

/// Bucket comments by context. Threads are ordered by their latest comment,
/// most recent first; comments inside a thread are chronological.
pub fn group_comments(comments: Vec<Comment>) -> Vec<ThreadGroup> {
    let mut order: Vec<CommentContext> = Vec::new();
    let mut buckets: HashMap<CommentContext, Vec<Comment>> = HashMap::new();

    for comment in comments {
        let context = comment.context();
        buckets
            .entry(context)
            .or_insert_with(|| {
                order.push(context);
                Vec::new()
            })
            .push(comment);
    }

    let mut groups: Vec<ThreadGroup> = order
        .into_iter()
        .filter_map(|context| {
            let mut comments = buckets.remove(&context)?;
            comments.sort_by_key(|c| c.created_at);
            let root = comments.first()?.clone();
            Some(ThreadGroup {
                key: context.to_string(),
                context,
                context_type: context.kind(),
                label: root.context_label().to_string(),
                root,
                comments,
            })
        })
        .collect();

    groups.sort_by(|a, b| b.last_activity_at().cmp(&a.last_activity_at()));
    groups
}

/// Flatten threads back into a single comment stream, thread order preserved.
pub fn flatten(groups: &[ThreadGroup]) -> Vec<Comment> {
    groups
        .iter()
        .flat_map(|g| g.comments.iter().cloned())
        .collect()
}
