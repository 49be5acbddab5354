// src/source/http.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::histogram;

use crate::source::config::SourceConfig;
use crate::source::types::{parse_csv, DataSource, Table};

/// Fetches published CSV sheets over HTTP.
pub struct HttpCsvSource {
    config: SourceConfig,
    client: reqwest::Client,
}

impl HttpCsvSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("building http client")?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl DataSource for HttpCsvSource {
    async fn fetch(&self, source_id: &str) -> Result<Table> {
        let url = self
            .config
            .url_for(source_id)
            .ok_or_else(|| anyhow!("no url configured for '{source_id}'"))?;

        let t0 = std::time::Instant::now();
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("fetching '{source_id}'"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("Failed to fetch data from: {url} (status {status})"));
        }

        let body = resp
            .text()
            .await
            .with_context(|| format!("reading body of '{source_id}'"))?;
        let table = parse_csv(&body).with_context(|| format!("parsing csv of '{source_id}'"))?;

        histogram!("source_fetch_ms").record(t0.elapsed().as_secs_f64() * 1000.0);
        tracing::debug!(target: "source", source_id, rows = table.len(), "fetched sheet");
        Ok(table)
    }

    fn name(&self) -> &'static str {
        "http-csv"
    }
}
