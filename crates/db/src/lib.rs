use std::str::FromStr;

use sqlx::{
    Error, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

pub mod models;

#[derive(Clone)]
pub struct DBService {
    pub pool: SqlitePool,
}

impl DBService {
    /// Open (creating if missing) the database at `database_url` and apply
    /// pending migrations.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<DBService, Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Self::migrate(&pool).await?;
        info!(database_url, "Database ready");
        Ok(DBService { pool })
    }

    /// Single-connection in-memory database. The connection is never recycled,
    /// otherwise the data would vanish with it.
    pub async fn new_in_memory() -> Result<DBService, Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::migrate(&pool).await?;
        Ok(DBService { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), Error> {
        sqlx::migrate!("./migrations").run(pool).await?;
        Ok(())
    }
}
