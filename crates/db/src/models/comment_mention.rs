use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use super::push_id_list;

/// Side-table record of a user mentioned in a comment, used for notifications
/// and audience filtering.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, TS)]
pub struct CommentMention {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub mentioned_user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl CommentMention {
    /// Record mentions of `user_ids` in a comment. Already-recorded pairs are
    /// skipped; returns the number of new rows.
    pub async fn create_many(
        pool: &SqlitePool,
        comment_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(0);
        }
        let now = Utc::now();
        let mut builder = QueryBuilder::<Sqlite>::new(
            "INSERT OR IGNORE INTO comment_mentions (id, comment_id, mentioned_user_id, created_at) ",
        );
        builder.push_values(user_ids, |mut row, user_id| {
            row.push_bind(Uuid::new_v4())
                .push_bind(comment_id)
                .push_bind(*user_id)
                .push_bind(now);
        });
        let result = builder.build().execute(pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn find_by_comment_ids(
        pool: &SqlitePool,
        comment_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        if comment_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, comment_id, mentioned_user_id, created_at FROM comment_mentions WHERE comment_id",
        );
        push_id_list(&mut builder, comment_ids);
        builder.build_query_as::<CommentMention>().fetch_all(pool).await
    }
}
