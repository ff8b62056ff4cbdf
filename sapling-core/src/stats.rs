//! Dashboard aggregation
//!
//! Pure read-side computation over full entity collections. Nothing
//! here is persisted or incremental: every dashboard load recomputes
//! from scratch, so the results are exactly as fresh as the source
//! rows handed in.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::{Batch, Day, Seedling};

/// A count grouped under an opaque string label (species or height
/// range).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GroupCount {
    pub label: String,
    pub count: i64,
}

/// Stock collected on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TrendPoint {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub date: Day,
    pub count: i64,
}

/// Stock collected within one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SeasonPoint {
    pub year: i32,
    pub month: u32,
    pub count: i64,
}

/// Everything the dashboard shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DashboardSummary {
    pub total: i64,
    pub species: Vec<GroupCount>,
    pub heights: Vec<GroupCount>,
    pub growth_trend: Vec<TrendPoint>,
    pub survival_rate: f64,
    pub seasonal_trend: Vec<SeasonPoint>,
}

/// Sum of stock across all seedlings.
pub fn total(seedlings: &[Seedling]) -> i64 {
    seedlings.iter().map(|s| s.count).sum()
}

/// Stock grouped by species, groups in first-occurrence order.
pub fn species_stats(seedlings: &[Seedling]) -> Vec<GroupCount> {
    group_by_label(seedlings, |s| &s.species)
}

/// Stock grouped by height-range label, groups in first-occurrence
/// order. Labels are opaque strings; there is no numeric binning.
pub fn height_stats(seedlings: &[Seedling]) -> Vec<GroupCount> {
    group_by_label(seedlings, |s| &s.height_range)
}

fn group_by_label<'a, F>(seedlings: &'a [Seedling], key: F) -> Vec<GroupCount>
where
    F: Fn(&'a Seedling) -> &'a str,
{
    let mut groups: Vec<GroupCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for seedling in seedlings {
        let label = key(seedling);
        match index.get(label) {
            Some(&i) => groups[i].count += seedling.count,
            None => {
                index.insert(label, groups.len());
                groups.push(GroupCount {
                    label: label.to_string(),
                    count: seedling.count,
                });
            }
        }
    }
    groups
}

/// Stock summed per distinct collection date, ascending by date.
///
/// Joined via `seedling.batch_id -> batch.id`; seedlings without a
/// batch (or with a dangling reference) contribute nothing.
pub fn growth_trend(seedlings: &[Seedling], batches: &[Batch]) -> Vec<TrendPoint> {
    let collected: HashMap<i64, Day> = batches.iter().map(|b| (b.id, b.collected_at)).collect();
    let mut by_date: BTreeMap<Day, i64> = BTreeMap::new();
    for seedling in seedlings {
        if let Some(date) = seedling.batch_id.and_then(|id| collected.get(&id)) {
            *by_date.entry(*date).or_insert(0) += seedling.count;
        }
    }
    by_date
        .into_iter()
        .map(|(date, count)| TrendPoint { date, count })
        .collect()
}

/// Survival percentage: sum of survived over sum of stock, times 100.
/// Yields 0.0 on an empty (or zero-stock) nursery rather than dividing
/// by zero.
pub fn survival_rate(seedlings: &[Seedling]) -> f64 {
    let total = total(seedlings);
    if total == 0 {
        return 0.0;
    }
    let survived: i64 = seedlings.iter().filter_map(|s| s.survived_count).sum();
    survived as f64 / total as f64 * 100.0
}

/// Stock grouped by (year, month) of the batch collection date,
/// chronological.
pub fn seasonal_trend(seedlings: &[Seedling], batches: &[Batch]) -> Vec<SeasonPoint> {
    let collected: HashMap<i64, Day> = batches.iter().map(|b| (b.id, b.collected_at)).collect();
    let mut by_month: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for seedling in seedlings {
        if let Some(date) = seedling.batch_id.and_then(|id| collected.get(&id)) {
            *by_month.entry((date.year(), date.month())).or_insert(0) += seedling.count;
        }
    }
    by_month
        .into_iter()
        .map(|((year, month), count)| SeasonPoint { year, month, count })
        .collect()
}

/// Compute the full dashboard summary from raw rows.
pub fn summarize(seedlings: &[Seedling], batches: &[Batch]) -> DashboardSummary {
    DashboardSummary {
        total: total(seedlings),
        species: species_stats(seedlings),
        heights: height_stats(seedlings),
        growth_trend: growth_trend(seedlings, batches),
        survival_rate: survival_rate(seedlings),
        seasonal_trend: seasonal_trend(seedlings, batches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn seedling(id: i64, species: &str, height: &str, count: i64) -> Seedling {
        Seedling {
            id,
            species: species.to_string(),
            height_range: height.to_string(),
            count,
            survived_count: None,
            dead_count: None,
            batch_id: None,
            zone_id: None,
        }
    }

    fn batch(id: i64, collected_at: NaiveDate) -> Batch {
        Batch {
            id,
            batch_code: format!("B-{id}"),
            collected_at,
            source_name: None,
            gps_latitude: None,
            gps_longitude: None,
            note: None,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_total_sums_counts() {
        let rows = vec![
            seedling(1, "teak", "10-15", 30),
            seedling(2, "teak", "15-20", 12),
            seedling(3, "yang", "10-15", 8),
        ];
        assert_eq!(total(&rows), 50);
        assert_eq!(total(&[]), 0);
    }

    #[test]
    fn test_species_stats_groups_in_first_occurrence_order() {
        let rows = vec![
            seedling(1, "teak", "10-15", 30),
            seedling(2, "yang", "10-15", 8),
            seedling(3, "teak", "15-20", 12),
        ];
        let stats = species_stats(&rows);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].label, "teak");
        assert_eq!(stats[0].count, 42);
        assert_eq!(stats[1].label, "yang");
        assert_eq!(stats[1].count, 8);
    }

    #[test]
    fn test_height_stats_treats_labels_as_opaque() {
        // "5-10" and "05-10" are distinct labels even though they name
        // the same numeric range.
        let rows = vec![
            seedling(1, "teak", "5-10", 3),
            seedling(2, "teak", "05-10", 4),
        ];
        let stats = height_stats(&rows);
        assert_eq!(stats.len(), 2);
    }

    #[test]
    fn test_growth_trend_joins_and_sorts_ascending() {
        let batches = vec![batch(1, day(2024, 6, 1)), batch(2, day(2024, 3, 15))];
        let mut early = seedling(1, "teak", "10-15", 5);
        early.batch_id = Some(2);
        let mut late = seedling(2, "yang", "10-15", 7);
        late.batch_id = Some(1);
        let unbatched = seedling(3, "yang", "15-20", 100);

        let trend = growth_trend(&[early, late, unbatched], &batches);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date, day(2024, 3, 15));
        assert_eq!(trend[0].count, 5);
        assert_eq!(trend[1].date, day(2024, 6, 1));
        assert_eq!(trend[1].count, 7);
    }

    #[test]
    fn test_growth_trend_ignores_dangling_batch_refs() {
        let mut orphan = seedling(1, "teak", "10-15", 5);
        orphan.batch_id = Some(99);
        assert!(growth_trend(&[orphan], &[]).is_empty());
    }

    #[test]
    fn test_survival_rate_zero_guard() {
        assert_eq!(survival_rate(&[]), 0.0);
        let zero_stock = vec![seedling(1, "teak", "10-15", 0)];
        assert_eq!(survival_rate(&zero_stock), 0.0);
    }

    #[test]
    fn test_survival_rate_percentage() {
        let mut a = seedling(1, "teak", "10-15", 80);
        a.survived_count = Some(60);
        let mut b = seedling(2, "yang", "10-15", 20);
        b.survived_count = None;
        let rate = survival_rate(&[a, b]);
        assert!((rate - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_seasonal_trend_groups_by_month() {
        let batches = vec![
            batch(1, day(2024, 3, 2)),
            batch(2, day(2024, 3, 28)),
            batch(3, day(2023, 11, 5)),
        ];
        let rows: Vec<Seedling> = [(1, 1, 4), (2, 2, 6), (3, 3, 9)]
            .into_iter()
            .map(|(id, batch_id, count)| {
                let mut s = seedling(id, "teak", "10-15", count);
                s.batch_id = Some(batch_id);
                s
            })
            .collect();

        let trend = seasonal_trend(&rows, &batches);
        assert_eq!(
            trend,
            vec![
                SeasonPoint { year: 2023, month: 11, count: 9 },
                SeasonPoint { year: 2024, month: 3, count: 10 },
            ]
        );
    }

    fn arb_seedling() -> impl Strategy<Value = Seedling> {
        (
            1i64..1000,
            prop::sample::select(vec!["teak", "yang", "padauk", "rosewood"]),
            prop::sample::select(vec!["5-10", "10-15", "15-20"]),
            0i64..10_000,
            prop::option::of(0i64..10_000),
            prop::option::of(1i64..10),
        )
            .prop_map(|(id, species, height, count, survived, batch_id)| Seedling {
                id,
                species: species.to_string(),
                height_range: height.to_string(),
                count,
                survived_count: survived,
                dead_count: None,
                batch_id,
                zone_id: None,
            })
    }

    fn arb_batches() -> impl Strategy<Value = Vec<Batch>> {
        prop::collection::vec((1i64..10, 0u32..3000), 0..8).prop_map(|specs| {
            specs
                .into_iter()
                .map(|(id, offset)| {
                    let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
                    batch(id, base + chrono::Duration::days(offset as i64))
                })
                .collect()
        })
    }

    proptest! {
        /// Aggregation is a pure function: same input, same output.
        #[test]
        fn prop_summarize_is_idempotent(
            seedlings in prop::collection::vec(arb_seedling(), 0..32),
            batches in arb_batches(),
        ) {
            let first = summarize(&seedlings, &batches);
            let second = summarize(&seedlings, &batches);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_group_totals_match_overall_total(
            seedlings in prop::collection::vec(arb_seedling(), 0..32),
        ) {
            let by_species: i64 = species_stats(&seedlings).iter().map(|g| g.count).sum();
            let by_height: i64 = height_stats(&seedlings).iter().map(|g| g.count).sum();
            prop_assert_eq!(by_species, total(&seedlings));
            prop_assert_eq!(by_height, total(&seedlings));
        }

        #[test]
        fn prop_survival_rate_never_nan(
            seedlings in prop::collection::vec(arb_seedling(), 0..32),
        ) {
            prop_assert!(survival_rate(&seedlings).is_finite());
        }
    }
}
