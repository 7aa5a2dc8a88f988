use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

pub mod activity_log;
pub mod comment;
pub mod comment_context;
pub mod comment_mention;
pub mod drawing_object;
pub mod floor_plan;
pub mod material;
pub mod profile;
pub mod project;
pub mod room;
pub mod task;

/// Append ` IN (?, ?, ...)` binding every id. Callers must skip the query for
/// an empty id list; `IN ()` is not valid SQL.
pub(crate) fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, ids: &[Uuid]) {
    builder.push(" IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}
