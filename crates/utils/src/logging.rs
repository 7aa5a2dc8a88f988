//! Tracing subscriber and Sentry error reporting setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Initialise Sentry when a DSN is configured. The returned guard must be kept
/// alive for the lifetime of the process so queued events are flushed on exit.
pub fn init_sentry(dsn: Option<&str>) -> Option<sentry::ClientInitGuard> {
    let dsn = dsn.filter(|dsn| !dsn.trim().is_empty())?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    )))
}

/// Install the global subscriber: `RUST_LOG`-driven fmt output plus the Sentry
/// layer, which turns error-level events into Sentry events. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(sentry_tracing::layer())
        .try_init();
}
