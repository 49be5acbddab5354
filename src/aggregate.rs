//! Count tables over tagged news.
//!
//! Three independent pure views, each recomputed from the full item slice:
//! - tag frequency
//! - competitor × tag cross-tabulation
//! - monthly activity per competitor
//!
//! Items without a competitor only count toward tag frequency.

use serde::Serialize;
use std::collections::HashMap;

use crate::dates::YearMonth;
use crate::news::NewsItem;
use crate::taxonomy::{Category, Taxonomy};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: Category,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompetitorTagCount {
    pub competitor: String,
    pub tag: Category,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub month: YearMonth,
    pub competitor: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    pub tag_frequency: Vec<TagCount>,
    pub competitor_tags: Vec<CompetitorTagCount>,
    pub monthly_activity: Vec<MonthlyCount>,
}

/// Rows per tag, most frequent first; ties follow taxonomy order.
pub fn tag_frequency(items: &[NewsItem], taxonomy: &Taxonomy) -> Vec<TagCount> {
    let mut counts: HashMap<Category, usize> = HashMap::new();
    for it in items {
        *counts.entry(it.tag).or_default() += 1;
    }
    let mut out: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    out.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| taxonomy.rank(a.tag).cmp(&taxonomy.rank(b.tag)))
    });
    out
}

/// Rows per (competitor, tag). Competitors with the most items come first (ties by
/// first appearance); tags within a competitor keep input appearance order.
pub fn competitor_tag_counts(items: &[NewsItem]) -> Vec<CompetitorTagCount> {
    // competitor → (first seen, total, [(tag, count)] in appearance order)
    let mut groups: Vec<(String, usize, Vec<(Category, usize)>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for it in items {
        let Some(comp) = it.competitor.as_deref() else {
            continue;
        };
        let gi = *index.entry(comp).or_insert_with(|| {
            groups.push((comp.to_string(), 0, Vec::new()));
            groups.len() - 1
        });
        let group = &mut groups[gi];
        group.1 += 1;
        match group.2.iter_mut().find(|(t, _)| *t == it.tag) {
            Some((_, n)) => *n += 1,
            None => group.2.push((it.tag, 1)),
        }
    }

    // stable sort keeps first-appearance order among equal totals
    groups.sort_by(|a, b| b.1.cmp(&a.1));

    groups
        .into_iter()
        .flat_map(|(competitor, _, tags)| {
            tags.into_iter().map(move |(tag, count)| CompetitorTagCount {
                competitor: competitor.clone(),
                tag,
                count,
            })
        })
        .collect()
}

/// Rows per (calendar month, competitor), months ascending, competitors in first-appearance order.
pub fn monthly_activity(items: &[NewsItem]) -> Vec<MonthlyCount> {
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut counts: HashMap<(YearMonth, &str), usize> = HashMap::new();

    for it in items {
        let Some(comp) = it.competitor.as_deref() else {
            continue;
        };
        let next = first_seen.len();
        first_seen.entry(comp).or_insert(next);
        *counts.entry((YearMonth::of(it.date), comp)).or_default() += 1;
    }

    let mut out: Vec<MonthlyCount> = counts
        .into_iter()
        .map(|((month, comp), count)| MonthlyCount {
            month,
            competitor: comp.to_string(),
            count,
        })
        .collect();
    out.sort_by_key(|m| (m.month, first_seen[m.competitor.as_str()]));
    out
}

/// All three views at once.
pub fn summarize(items: &[NewsItem], taxonomy: &Taxonomy) -> AggregationResult {
    AggregationResult {
        tag_frequency: tag_frequency(items, taxonomy),
        competitor_tags: competitor_tag_counts(items),
        monthly_activity: monthly_activity(items),
    }
}
