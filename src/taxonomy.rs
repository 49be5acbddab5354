// src/taxonomy.rs
//! Announcement taxonomy: the ordered (category, keywords) table used by the tagger.
//!
//! The table is loaded once at startup:
//! 1) $TAXONOMY_CONFIG_PATH
//! 2) config/taxonomy.toml
//! 3) config/taxonomy.json
//! 4) built-in table (`Taxonomy::builtin`)
//!
//! Declaration order is the tie-break: the first category with a matching keyword wins.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_TAXONOMY_CONFIG_PATH: &str = "TAXONOMY_CONFIG_PATH";
pub const DEFAULT_TAXONOMY_TOML: &str = "config/taxonomy.toml";
pub const DEFAULT_TAXONOMY_JSON: &str = "config/taxonomy.json";

/// Announcement type assigned to a news headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Funding")]
    Funding,
    #[serde(rename = "Product Launch")]
    ProductLaunch,
    #[serde(rename = "M&A")]
    MergersAcquisitions,
    #[serde(rename = "Partnership")]
    Partnership,
    #[serde(rename = "IPO / Capital Market")]
    CapitalMarket,
    #[serde(rename = "Clinical Development")]
    ClinicalDevelopment,
    #[serde(rename = "Patent")]
    Patent,
    #[serde(rename = "Recognition")]
    Recognition,
    #[serde(rename = "Regulatory")]
    Regulatory,
    #[serde(rename = "Corporate Update")]
    CorporateUpdate,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// Every category in built-in taxonomy order, fallback last.
    pub const ALL: [Category; 11] = [
        Category::Funding,
        Category::ProductLaunch,
        Category::MergersAcquisitions,
        Category::Partnership,
        Category::CapitalMarket,
        Category::ClinicalDevelopment,
        Category::Patent,
        Category::Recognition,
        Category::Regulatory,
        Category::CorporateUpdate,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Funding => "Funding",
            Category::ProductLaunch => "Product Launch",
            Category::MergersAcquisitions => "M&A",
            Category::Partnership => "Partnership",
            Category::CapitalMarket => "IPO / Capital Market",
            Category::ClinicalDevelopment => "Clinical Development",
            Category::Patent => "Patent",
            Category::Recognition => "Recognition",
            Category::Regulatory => "Regulatory",
            Category::CorporateUpdate => "Corporate Update",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    /// Case-insensitive lookup by display label.
    fn from_str(s: &str) -> Result<Self> {
        let t = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(t))
            .ok_or_else(|| anyhow!("unknown category '{t}'"))
    }
}

/// One row of the taxonomy table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomyEntry {
    pub tag: Category,
    /// Lower-case literal substrings, de-duplicated and sorted.
    pub keywords: Vec<String>,
}

impl TaxonomyEntry {
    fn matches(&self, lowered_title: &str) -> bool {
        self.keywords.iter().any(|k| lowered_title.contains(k.as_str()))
    }
}

/// Ordered keyword table plus the fallback category for "no match".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Taxonomy {
    entries: Vec<TaxonomyEntry>,
    fallback: Category,
}

impl Taxonomy {
    /// Build a taxonomy from ordered (category, keywords) pairs.
    ///
    /// Keywords are trimmed and lower-cased; blanks are dropped. Fails if a category
    /// repeats, if `Other` is listed, or if a category ends up without keywords.
    pub fn from_entries<I, K, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Category, K)>,
        K: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for (tag, keywords) in entries {
            if tag == Category::Other {
                bail!("'Other' is the fallback category and cannot own keywords");
            }
            if !seen.insert(tag) {
                bail!("category '{tag}' is listed more than once");
            }
            let keywords = clean_keywords(keywords);
            if keywords.is_empty() {
                bail!("category '{tag}' has no keywords");
            }
            out.push(TaxonomyEntry { tag, keywords });
        }
        Ok(Self {
            entries: out,
            fallback: Category::Other,
        })
    }

    /// Built-in announcement taxonomy.
    pub fn builtin() -> Self {
        let table: [(Category, &[&str]); 10] = [
            (
                Category::Funding,
                &[
                    "raises",
                    "raised",
                    "funding",
                    "series a",
                    "series b",
                    "series c",
                    "series d",
                    "seed round",
                    "investment",
                    "financing",
                    "venture capital",
                ],
            ),
            (
                Category::ProductLaunch,
                &[
                    "launch",
                    "unveil",
                    "introduces",
                    "release",
                    "rolls out",
                    "debut",
                    "new product",
                ],
            ),
            (
                Category::MergersAcquisitions,
                &["acquire", "acquisition", "merger", "merges", "buys", "takeover"],
            ),
            (
                Category::Partnership,
                &[
                    "partner",
                    "collaborat",
                    "alliance",
                    "teams up",
                    "joint venture",
                ],
            ),
            (
                Category::CapitalMarket,
                &[
                    "ipo",
                    "public offering",
                    "sec filing",
                    "files with sec",
                    "nasdaq",
                    "nyse",
                    "s-1",
                ],
            ),
            (
                Category::ClinicalDevelopment,
                &[
                    "clinical trial",
                    "phase 1",
                    "phase 2",
                    "phase 3",
                    "phase i",
                    "first patient",
                    "trial results",
                ],
            ),
            (
                Category::Patent,
                &["patent", "intellectual property"],
            ),
            (
                Category::Recognition,
                &["award", "grant", "honored", "recognized", "named to", "wins"],
            ),
            (
                Category::Regulatory,
                &[
                    "fda",
                    "approval",
                    "approved",
                    "clearance",
                    "ce mark",
                    "regulatory",
                ],
            ),
            (
                Category::CorporateUpdate,
                &[
                    "expands",
                    "expansion",
                    "hires",
                    "appoints",
                    "rebrand",
                    "headquarters",
                    "new office",
                    "ceo",
                ],
            ),
        ];
        Self {
            entries: table
                .iter()
                .map(|(tag, kws)| TaxonomyEntry {
                    tag: *tag,
                    keywords: clean_keywords(kws.iter()),
                })
                .collect(),
            fallback: Category::Other,
        }
    }

    /// Assign exactly one category: the first entry (in table order) with a keyword
    /// contained in the lower-cased title, otherwise the fallback.
    pub fn classify(&self, title: &str) -> Category {
        let lowered = title.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.matches(&lowered))
            .map(|e| e.tag)
            .unwrap_or(self.fallback)
    }

    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    pub fn fallback(&self) -> Category {
        self.fallback
    }

    /// Position of `tag` in the table; the fallback sorts after every entry.
    pub fn rank(&self, tag: Category) -> usize {
        self.entries
            .iter()
            .position(|e| e.tag == tag)
            .unwrap_or(self.entries.len())
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

// --- loading ---

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    categories: Vec<EntryFile>,
}

#[derive(Debug, Deserialize)]
struct EntryFile {
    tag: String,
    keywords: Vec<String>,
}

/// Load a taxonomy from an explicit path. Supports TOML or JSON formats.
pub fn load_taxonomy_from(path: &Path) -> Result<Taxonomy> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading taxonomy from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_taxonomy(&content, ext.as_str())
        .with_context(|| format!("parsing taxonomy from {}", path.display()))
}

/// Load the taxonomy using env var + fallbacks, ending with the built-in table.
pub fn load_taxonomy_default() -> Result<Taxonomy> {
    if let Ok(p) = std::env::var(ENV_TAXONOMY_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_taxonomy_from(&pb);
        }
        return Err(anyhow!("TAXONOMY_CONFIG_PATH points to non-existent path"));
    }
    for candidate in [DEFAULT_TAXONOMY_TOML, DEFAULT_TAXONOMY_JSON] {
        let pb = PathBuf::from(candidate);
        if pb.exists() {
            return load_taxonomy_from(&pb);
        }
    }
    tracing::debug!(target: "taxonomy", "no taxonomy file found, using built-in table");
    Ok(Taxonomy::builtin())
}

fn parse_taxonomy(s: &str, hint_ext: &str) -> Result<Taxonomy> {
    let file: TaxonomyFile = if hint_ext == "json" {
        serde_json::from_str(s)?
    } else if hint_ext == "toml" {
        toml::from_str(s)?
    } else {
        match toml::from_str(s) {
            Ok(v) => v,
            Err(_) => serde_json::from_str(s).map_err(|_| anyhow!("unsupported taxonomy format"))?,
        }
    };

    let mut pairs = Vec::with_capacity(file.categories.len());
    for e in file.categories {
        let tag: Category = e.tag.parse()?;
        pairs.push((tag, e.keywords));
    }
    Taxonomy::from_entries(pairs)
}

fn clean_keywords<K, S>(items: K) -> Vec<String>
where
    K: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = BTreeSet::new();
    for it in items {
        let t = it.as_ref().trim().to_lowercase();
        if !t.is_empty() {
            set.insert(t);
        }
    }
    set.into_iter().collect()
}
