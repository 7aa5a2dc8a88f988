//! Merged comment + activity feed.

use chrono::{DateTime, Utc};
use db::models::{activity_log::ActivityLogItem, comment::Comment};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use super::{
    activity_feed::ActivityFeedService,
    comment_feed::{CommentFeedError, CommentFeedService},
    comment_threads::{flatten, group_comments},
    feed_store::FeedStore,
};

#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "kind", content = "item", rename_all = "snake_case")]
pub enum UnifiedFeedItem {
    Comment(Comment),
    Activity(ActivityLogItem),
}

impl UnifiedFeedItem {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Comment(comment) => comment.created_at,
            Self::Activity(activity) => activity.created_at,
        }
    }
}

/// Which item kinds a feed view shows.
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeedFilter {
    #[default]
    All,
    Comments,
    Activity,
}

impl FeedFilter {
    pub fn matches(&self, item: &UnifiedFeedItem) -> bool {
        match (self, item) {
            (Self::All, _) => true,
            (Self::Comments, UnifiedFeedItem::Comment(_)) => true,
            (Self::Activity, UnifiedFeedItem::Activity(_)) => true,
            _ => false,
        }
    }

    pub fn apply(&self, items: Vec<UnifiedFeedItem>) -> Vec<UnifiedFeedItem> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

/// Newest first. The sort is stable: equal timestamps keep the order of
/// `comments` followed by `activities`.
pub fn merge(comments: Vec<Comment>, activities: Vec<ActivityLogItem>) -> Vec<UnifiedFeedItem> {
    let mut items: Vec<UnifiedFeedItem> = comments
        .into_iter()
        .map(UnifiedFeedItem::Comment)
        .chain(activities.into_iter().map(UnifiedFeedItem::Activity))
        .collect();
    items.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    items
}

pub struct UnifiedFeedService;

impl UnifiedFeedService {
    /// Load and merge the project's threaded comments and activity log.
    pub async fn load<S>(
        store: &S,
        project_id: Uuid,
        activity_limit: Option<i64>,
    ) -> Result<Vec<UnifiedFeedItem>, CommentFeedError>
    where
        S: FeedStore + ?Sized,
    {
        let (comments, activities) = tokio::join!(
            CommentFeedService::aggregate(store, project_id),
            ActivityFeedService::fetch(store, project_id, activity_limit),
        );
        let threads = group_comments(comments?);
        Ok(merge(flatten(&threads), activities))
    }
}
