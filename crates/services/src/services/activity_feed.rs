//! Project activity log reader.

use db::models::activity_log::ActivityLogItem;
use tracing::error;
use uuid::Uuid;

use super::feed_store::FeedStore;

pub struct ActivityFeedService;

impl ActivityFeedService {
    /// Activity entries for the project, newest first. A failed read is logged
    /// and yields an empty list so the rest of the feed still renders.
    pub async fn fetch<S>(store: &S, project_id: Uuid, limit: Option<i64>) -> Vec<ActivityLogItem>
    where
        S: FeedStore + ?Sized,
    {
        match store.activities(project_id, limit).await {
            Ok(mut activities) => {
                activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                activities
            }
            Err(e) => {
                error!(
                    project_id = %project_id,
                    error = %e,
                    "Failed to load project activity"
                );
                Vec::new()
            }
        }
    }
}
