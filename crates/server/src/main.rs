use anyhow::Context;
use db::DBService;
use server::{AppState, config::Config, routes};
use tracing::info;
use utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Held for the process lifetime; dropping it flushes pending events.
    let _sentry = logging::init_sentry(config.sentry_dsn.as_deref());
    logging::init_tracing();

    let db = DBService::new(&config.database_url, config.db_max_connections)
        .await
        .with_context(|| format!("failed to open database at {}", config.database_url))?;

    let bind_addr = config.bind_addr;
    let app = routes::router(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Serving project feed on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
