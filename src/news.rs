//! News feed preparation: raw sheet rows → dated, tagged `NewsItem`s.
//!
//! Titles default to "", rows without a parseable date are dropped (counted,
//! never an error), and every kept row gets exactly one taxonomy tag.

use chrono::NaiveDate;
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::dates::parse_date;
use crate::source::types::{Row, Table};
use crate::taxonomy::{Category, Taxonomy};

/// One feed row as delivered by the data source; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNewsRow {
    #[serde(default)]
    pub competitor: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl RawNewsRow {
    pub fn from_row(row: &Row) -> Self {
        let cell = |c: &str| row.get(c).map(str::to_string);
        Self {
            competitor: cell("competitor"),
            title: cell("title"),
            date: cell("date"),
            link: cell("link"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    pub competitor: Option<String>,
    pub title: String,
    pub date: NaiveDate,
    pub link: Option<String>,
    pub tag: Category,
}

/// Tagged items plus how many rows were dropped for a missing/bad date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreparedNews {
    pub items: Vec<NewsItem>,
    pub dropped: usize,
}

/// Coalesce, date-filter and tag raw rows, preserving input order.
pub fn prepare_news<'a, I>(rows: I, taxonomy: &Taxonomy) -> PreparedNews
where
    I: IntoIterator<Item = &'a RawNewsRow>,
{
    let mut out = PreparedNews::default();
    for raw in rows {
        let Some(date) = raw.date.as_deref().and_then(parse_date) else {
            tracing::debug!(target: "news", date = ?raw.date, "dropping row without a usable date");
            out.dropped += 1;
            continue;
        };
        let title = raw.title.clone().unwrap_or_default();
        let tag = taxonomy.classify(&title);
        out.items.push(NewsItem {
            competitor: non_blank(raw.competitor.as_deref()),
            title,
            date,
            link: non_blank(raw.link.as_deref()),
            tag,
        });
    }

    counter!("news_rows_dropped_total").increment(out.dropped as u64);
    counter!("news_items_tagged_total").increment(out.items.len() as u64);
    out
}

/// `prepare_news` over a fetched sheet.
pub fn prepare_table(table: &Table, taxonomy: &Taxonomy) -> PreparedNews {
    let raw: Vec<RawNewsRow> = table.rows.iter().map(RawNewsRow::from_row).collect();
    prepare_news(&raw, taxonomy)
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
