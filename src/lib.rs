// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod aggregate;
pub mod api;
pub mod dates;
pub mod funding;
pub mod metrics;
pub mod news;
pub mod source;
pub mod tagger;
pub mod taxonomy;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{summarize, AggregationResult};
pub use crate::api::{create_router, AppState};
pub use crate::news::{prepare_news, NewsItem, RawNewsRow};
pub use crate::tagger::classify;
pub use crate::taxonomy::{Category, Taxonomy};

use std::sync::Arc;

use crate::source::{CachedSource, HttpCsvSource, SourceConfig};

/// Build the app state from loaded config: taxonomy (file or built-in) and a
/// cached HTTP CSV source over `config`.
pub fn build_state(config: SourceConfig) -> anyhow::Result<AppState> {
    let taxonomy = taxonomy::load_taxonomy_default()?;
    tracing::info!(
        target: "startup",
        categories = taxonomy.entries().len(),
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "taxonomy loaded"
    );
    let ttl = config.cache_ttl;
    let http = HttpCsvSource::new(config)?;
    let source = Arc::new(CachedSource::new(http, ttl));
    Ok(AppState::new(source, taxonomy))
}
