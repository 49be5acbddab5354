// src/source/fixture.rs
//! In-memory source for tests and offline runs.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::source::types::{DataSource, Table};

#[derive(Default)]
pub struct StaticSource {
    tables: HashMap<String, Table>,
    failures: HashMap<String, String>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, source_id: &str, table: Table) -> Self {
        self.tables.insert(source_id.to_string(), table);
        self
    }

    /// Make `source_id` fail with `message` on every fetch.
    pub fn with_failure(mut self, source_id: &str, message: &str) -> Self {
        self.failures
            .insert(source_id.to_string(), message.to_string());
        self
    }

    /// Number of `fetch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn fetch(&self, source_id: &str) -> Result<Table> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = self.failures.get(source_id) {
            return Err(anyhow!("{msg}"));
        }
        self.tables
            .get(source_id)
            .cloned()
            .ok_or_else(|| anyhow!("no fixture for '{source_id}'"))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
