use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Public profile of an authenticated user.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        display_name: &str,
        email: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            r#"INSERT INTO profiles (id, display_name, email, created_at)
               VALUES ($1, $2, $3, $4)
               RETURNING id, display_name, email, created_at"#,
        )
        .bind(id)
        .bind(display_name)
        .bind(email)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }
}
