// src/source/cache.rs
//! TTL cache in front of any `DataSource`. Only successful fetches are cached.

use anyhow::Result;
use async_trait::async_trait;
use metrics::counter;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::source::types::{DataSource, Table};

pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, Table)>>,
}

impl<S: DataSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lookup(&self, source_id: &str) -> Option<Table> {
        let map = self.entries.lock().expect("source cache mutex poisoned");
        map.get(source_id)
            .filter(|(at, _)| at.elapsed() < self.ttl)
            .map(|(_, t)| t.clone())
    }

    /// Drop every cached sheet.
    pub fn clear(&self) {
        self.entries
            .lock()
            .expect("source cache mutex poisoned")
            .clear();
    }
}

#[async_trait]
impl<S: DataSource> DataSource for CachedSource<S> {
    async fn fetch(&self, source_id: &str) -> Result<Table> {
        if let Some(hit) = self.lookup(source_id) {
            counter!("source_cache_hits_total").increment(1);
            return Ok(hit);
        }
        let fresh = self.inner.fetch(source_id).await?;
        self.entries
            .lock()
            .expect("source cache mutex poisoned")
            .insert(source_id.to_string(), (Instant::now(), fresh.clone()));
        Ok(fresh)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
