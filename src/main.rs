//! Funding Intelligence Service — Binary Entrypoint
//! Boots the Axum HTTP server: resolves sheet URLs from secrets, loads the
//! taxonomy once, and mounts the dashboard API plus `/metrics`.

use funding_intel::{api, build_state, metrics::Metrics, source::SourceConfig};
use shuttle_axum::ShuttleAxum;
use shuttle_runtime::SecretStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default, JSON lines with LOG_FORMAT=json.
/// Filter from RUST_LOG, falling back to `funding_intel=info,warn`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("funding_intel=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // A subscriber may already be installed by the runtime; keep it in that case.
    let _ = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
}

#[shuttle_runtime::main]
async fn axum(#[shuttle_runtime::Secrets] secrets: SecretStore) -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    // Secrets first, env vars (FUNDING_DATA_URL, ...) as the local fallback.
    let config = SourceConfig::from_lookup(|key| {
        secrets
            .get(key)
            .or_else(|| std::env::var(key.to_ascii_uppercase()).ok())
    });
    let ttl_secs = config.cache_ttl.as_secs();

    let state = build_state(config)?;
    let metrics = Metrics::init(ttl_secs)?;

    let router = api::create_router(state).merge(metrics.router());

    Ok(router.into())
}
