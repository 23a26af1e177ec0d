//! Dashboard aggregates derived from the initiative collection.
//!
//! Every function here is total and pure. Aggregates are always computed over
//! the whole collection, never a filtered view, and nothing is persisted.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Initiative, InitiativeStatus};

/// Month key used for completed initiatives without a completion date.
pub const UNKNOWN_MONTH: &str = "Unknown";

/// Per-department rollup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DepartmentStats {
    /// Completed initiatives.
    pub completed: usize,
    /// All initiatives.
    pub total: usize,
    /// Cost savings from completed initiatives only.
    pub savings: f64,
}

impl DepartmentStats {
    /// Fraction of initiatives completed, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// One point of the monthly trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    /// `YYYY-MM`, or [`UNKNOWN_MONTH`].
    pub month: String,
    /// Initiatives completed in the month.
    pub completed_count: usize,
    /// Their summed cost savings.
    pub savings_sum: f64,
}

/// Headline figures for the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// All initiatives.
    pub total: usize,
    /// Completed initiatives.
    pub completed: usize,
    /// Initiatives in progress.
    pub in_progress: usize,
    /// Cost savings summed over every initiative, whatever its status.
    pub total_cost_savings: f64,
    /// Hours saved summed over every initiative, whatever its status.
    pub total_time_saved: f64,
}

/// Count initiatives per status. Statuses with no initiatives are absent.
#[must_use]
pub fn status_counts(records: &[Initiative]) -> BTreeMap<InitiativeStatus, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.status).or_insert(0) += 1;
    }
    counts
}

/// Roll up totals, completions and completed savings per department.
#[must_use]
pub fn department_stats(records: &[Initiative]) -> BTreeMap<String, DepartmentStats> {
    let mut stats: BTreeMap<String, DepartmentStats> = BTreeMap::new();
    for record in records {
        let entry = stats.entry(record.department.clone()).or_default();
        entry.total += 1;
        if record.is_completed() {
            entry.completed += 1;
            entry.savings += record.cost_savings;
        }
    }
    stats
}

/// Completed initiatives bucketed by completion month, ascending by key.
///
/// Keys sort as strings, so `YYYY-MM` buckets are chronological and
/// [`UNKNOWN_MONTH`] lands wherever it falls lexicographically (after every
/// digit-led month).
#[must_use]
pub fn monthly_trend(records: &[Initiative]) -> Vec<MonthlyBucket> {
    let mut buckets: BTreeMap<String, MonthlyBucket> = BTreeMap::new();
    for record in records.iter().filter(|r| r.is_completed()) {
        let month = record.date_completed.map_or_else(
            || UNKNOWN_MONTH.to_string(),
            |date| date.format("%Y-%m").to_string(),
        );
        let bucket = buckets
            .entry(month.clone())
            .or_insert_with(|| MonthlyBucket {
                month,
                completed_count: 0,
                savings_sum: 0.0,
            });
        bucket.completed_count += 1;
        bucket.savings_sum += record.cost_savings;
    }
    buckets.into_values().collect()
}

/// Headline totals across the whole collection.
#[must_use]
pub fn summary(records: &[Initiative]) -> Summary {
    records.iter().fold(Summary::default(), |mut acc, record| {
        acc.total += 1;
        match record.status {
            InitiativeStatus::Completed => acc.completed += 1,
            InitiativeStatus::InProgress => acc.in_progress += 1,
            InitiativeStatus::Proposed | InitiativeStatus::Archived => {}
        }
        acc.total_cost_savings += record.cost_savings;
        acc.total_time_saved += record.time_saved;
        acc
    })
}

/// Distinct departments in first-seen order, for the department filter.
#[must_use]
pub fn departments(records: &[Initiative]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for record in records {
        if !seen.contains(&record.department.as_str()) {
            seen.push(&record.department);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InitiativeDraft;
    use crate::seed;
    use chrono::NaiveDate;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn initiative(
        department: &str,
        status: InitiativeStatus,
        completed: Option<&str>,
        savings: f64,
    ) -> Initiative {
        let draft = InitiativeDraft {
            department: Some(department.to_string()),
            status: Some(status),
            date_started: Some(day("2020-01-01")),
            date_completed: Some(completed.map(day)),
            cost_savings: Some(savings),
            ..InitiativeDraft::new("T", "P")
        };
        Initiative::from_draft("x".into(), day("2020-01-01"), draft, "U")
    }

    #[test]
    fn test_status_counts_for_sample_scenario() {
        let counts = status_counts(&seed::initiatives());

        assert_eq!(counts.get(&InitiativeStatus::Completed), Some(&2));
        assert_eq!(counts.get(&InitiativeStatus::InProgress), Some(&1));
        assert!(!counts.contains_key(&InitiativeStatus::Proposed));
        assert!(!counts.contains_key(&InitiativeStatus::Archived));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_department_stats_for_sample_scenario() {
        let stats = department_stats(&seed::initiatives());

        assert_eq!(
            stats["Production"],
            DepartmentStats {
                completed: 1,
                total: 1,
                savings: 3750.0,
            }
        );
        assert_eq!(stats["Quality"].completed, 0);
        assert_eq!(stats["Quality"].total, 1);
        assert!(stats["Supply Chain"].savings > 44_999.0);
    }

    #[test]
    fn test_department_savings_only_from_completed() {
        let records = vec![
            initiative("Ops", InitiativeStatus::Completed, Some("2024-01-05"), 100.0),
            initiative("Ops", InitiativeStatus::InProgress, None, 900.0),
            initiative("Ops", InitiativeStatus::Archived, None, 50.0),
        ];
        let stats = department_stats(&records);
        assert_eq!(stats["Ops"].total, 3);
        assert_eq!(stats["Ops"].completed, 1);
        assert!((stats["Ops"].savings - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_department_completed_never_exceeds_total() {
        let mut records = seed::initiatives();
        records.push(initiative("Production", InitiativeStatus::Proposed, None, 0.0));
        records.push(initiative("", InitiativeStatus::Completed, Some("2024-05-01"), 1.0));

        for stats in department_stats(&records).values() {
            assert!(stats.completed <= stats.total);
            let rate = stats.completion_rate();
            assert!((0.0..=1.0).contains(&rate));
        }
    }

    #[test]
    fn test_completion_rate_empty_is_zero() {
        assert!(DepartmentStats::default().completion_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn test_monthly_trend_sorted_and_summed() {
        let trend = monthly_trend(&seed::initiatives());
        assert_eq!(
            trend,
            vec![
                MonthlyBucket {
                    month: "2024-01".to_string(),
                    completed_count: 1,
                    savings_sum: 45000.0,
                },
                MonthlyBucket {
                    month: "2024-02".to_string(),
                    completed_count: 1,
                    savings_sum: 3750.0,
                },
            ]
        );
    }

    #[test]
    fn test_monthly_trend_groups_same_month() {
        let records = vec![
            initiative("A", InitiativeStatus::Completed, Some("2024-03-02"), 10.0),
            initiative("B", InitiativeStatus::Completed, Some("2024-03-28"), 5.5),
        ];
        let trend = monthly_trend(&records);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].completed_count, 2);
        assert!((trend[0].savings_sum - 15.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_monthly_trend_unknown_bucket_sorts_last() {
        let records = vec![
            initiative("A", InitiativeStatus::Completed, None, 7.0),
            initiative("B", InitiativeStatus::Completed, Some("2023-12-01"), 1.0),
            initiative("C", InitiativeStatus::InProgress, Some("2022-01-01"), 99.0),
        ];
        let months: Vec<_> = monthly_trend(&records)
            .into_iter()
            .map(|b| b.month)
            .collect();
        assert_eq!(months, vec!["2023-12", UNKNOWN_MONTH]);
    }

    #[test]
    fn test_monthly_trend_sum_matches_completed_savings() {
        let mut records = seed::initiatives();
        records.push(initiative("X", InitiativeStatus::Completed, None, 12.25));
        records.push(initiative("Y", InitiativeStatus::Proposed, None, 400.0));

        let bucket_sum: f64 = monthly_trend(&records).iter().map(|b| b.savings_sum).sum();
        let completed_sum: f64 = records
            .iter()
            .filter(|r| r.is_completed())
            .map(|r| r.cost_savings)
            .sum();
        assert!((bucket_sum - completed_sum).abs() < 1e-9);
    }

    #[test]
    fn test_summary_totals_cover_every_status() {
        let summary = summary(&seed::initiatives());
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.in_progress, 1);
        assert!((summary.total_cost_savings - 48750.0).abs() < f64::EPSILON);
        assert!((summary.total_time_saved - 205.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_departments_first_seen_order() {
        let mut records = seed::initiatives();
        records.push(initiative("Production", InitiativeStatus::Proposed, None, 0.0));
        assert_eq!(
            departments(&records),
            vec!["Production", "Quality", "Supply Chain"]
        );
    }

    #[test]
    fn test_aggregates_of_empty_collection() {
        assert!(status_counts(&[]).is_empty());
        assert!(department_stats(&[]).is_empty());
        assert!(monthly_trend(&[]).is_empty());
        assert_eq!(summary(&[]), Summary::default());
        assert!(departments(&[]).is_empty());
    }
}
