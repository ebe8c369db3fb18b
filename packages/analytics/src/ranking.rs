//! Category ranking and yearly counts.
//!
//! Every "top N" chart goes through [`rank_categories`]: count rows per
//! category, keep the N largest, and only then drop sentinel categories.
//! Dropping after truncation means a chart whose top N is crowded with
//! `Unknown` shows fewer than N bars; nothing is backfilled.

use std::collections::BTreeMap;

use collision_dash_analytics_models::{CategoryCount, YearCount};
use collision_dash_collision_models::{CrashRecord, UNKNOWN, UNSPECIFIED, is_sentinel};

/// Sentinels excluded from most rankings.
pub const UNKNOWN_SENTINELS: &[&str] = &[UNKNOWN];

/// Sentinels excluded from the contributing-factor ranking.
pub const FACTOR_SENTINELS: &[&str] = &[UNKNOWN, UNSPECIFIED];

/// Counts rows per category, largest first.
///
/// Ties keep the order in which each category first appeared.
pub fn count_categories<'r, I, F>(records: I, field: F) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'r CrashRecord>,
    F: Fn(&'r CrashRecord) -> &'r str,
{
    let mut counts: BTreeMap<&str, (u64, usize)> = BTreeMap::new();
    for (index, record) in records.into_iter().enumerate() {
        counts.entry(field(record)).or_insert((0, index)).0 += 1;
    }

    let mut ordered: Vec<(&str, u64, usize)> = counts
        .into_iter()
        .map(|(category, (count, first_seen))| (category, count, first_seen))
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ordered
        .into_iter()
        .map(|(category, count, _)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect()
}

/// Keeps the first `top_n` entries of an already ranked list, then drops
/// sentinel categories.
#[must_use]
pub fn top_n_excluding(
    mut ranked: Vec<CategoryCount>,
    top_n: usize,
    sentinels: &[&str],
) -> Vec<CategoryCount> {
    ranked.truncate(top_n);
    ranked.retain(|c| !is_sentinel(&c.category, sentinels));
    ranked
}

/// Top `top_n` categories of `field`, excluding `sentinels` after
/// truncation.
pub fn rank_categories<'r, I, F>(
    records: I,
    field: F,
    top_n: usize,
    sentinels: &[&str],
) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'r CrashRecord>,
    F: Fn(&'r CrashRecord) -> &'r str,
{
    top_n_excluding(count_categories(records, field), top_n, sentinels)
}

/// Rows per crash year, ascending. Rows without a year are skipped.
pub fn year_counts<'r>(records: impl IntoIterator<Item = &'r CrashRecord>) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
    for year in records.into_iter().filter_map(|r| r.year) {
        *counts.entry(year).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}
