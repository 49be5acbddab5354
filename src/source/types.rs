// src/source/types.rs
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;

/// One sheet row keyed by normalized (trimmed, lower-cased) header. Blank cells are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut cells = HashMap::new();
        for (k, v) in pairs {
            let v = v.as_ref().trim();
            if !v.is_empty() {
                cells.insert(header_key(k.as_ref()), v.to_string());
            }
        }
        Self { cells }
    }

    /// Case-insensitive column lookup; `None` for missing columns and blank cells.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(&header_key(column)).map(String::as_str)
    }
}

/// Parsed CSV payload: headers in sheet order plus rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    #[serde(skip)]
    pub rows: Vec<Row>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Parse CSV text (header row first). Ragged rows are tolerated; missing trailing cells are blank.
pub fn parse_csv(text: &str) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading csv headers")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (i, rec) in reader.records().enumerate() {
        let rec = rec.with_context(|| format!("reading csv record {}", i + 1))?;
        rows.push(Row::from_pairs(headers.iter().zip(rec.iter())));
    }
    Ok(Table { headers, rows })
}

fn header_key(h: &str) -> String {
    h.trim().to_lowercase()
}

/// Where tabular sheets come from (published CSV over HTTP, fixtures in tests).
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, source_id: &str) -> Result<Table>;
    fn name(&self) -> &'static str;
}
