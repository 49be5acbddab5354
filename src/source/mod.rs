// src/source/mod.rs
pub mod cache;
pub mod config;
pub mod fixture;
pub mod http;
pub mod types;

use anyhow::Result;
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

pub use cache::CachedSource;
pub use config::SourceConfig;
pub use fixture::StaticSource;
pub use http::HttpCsvSource;
pub use types::{parse_csv, DataSource, Row, Table};

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("source_fetch_total", "Sheet fetches requested by the API.");
        describe_counter!(
            "source_fetch_errors_total",
            "Sheet fetches that failed (network, status, csv)."
        );
        describe_counter!(
            "source_cache_hits_total",
            "Sheet fetches served from the TTL cache."
        );
        describe_histogram!("source_fetch_ms", "Upstream sheet fetch time in milliseconds.");
        describe_counter!(
            "news_rows_dropped_total",
            "News rows dropped for a missing or unparseable date."
        );
        describe_counter!("news_items_tagged_total", "News items tagged.");
    });
}

/// Fetch `source_id`, with telemetry. Failures are logged and returned to the caller.
pub async fn fetch_table(source: &dyn DataSource, source_id: &str) -> Result<Table> {
    ensure_metrics_described();
    counter!("source_fetch_total").increment(1);
    match source.fetch(source_id).await {
        Ok(t) => Ok(t),
        Err(e) => {
            tracing::warn!(
                target: "source",
                error = ?e,
                source = source.name(),
                source_id,
                "sheet fetch failed"
            );
            counter!("source_fetch_errors_total").increment(1);
            Err(e)
        }
    }
}
