//! Summary metrics and the derived chart views over a [`FilteredView`].
//!
//! Every function here is total: an empty view produces the documented
//! zero state, never an error, and nothing is mutated.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::filter::FilteredView;
use crate::config::{HISTOGRAM_BINS, TOP_ROLES};

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Scalar headline numbers of the filtered survey.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryMetrics {
    pub mean_salary: f64,
    pub max_salary: f64,
    pub record_count: usize,
    /// Mode of `role`; ties go to the lexicographically smallest role.
    pub most_frequent_role: String,
}

pub fn summarize(view: &FilteredView<'_>) -> SummaryMetrics {
    if view.is_empty() {
        return SummaryMetrics::default();
    }

    let mut total = 0.0;
    let mut max = f64::NEG_INFINITY;
    let mut role_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in view.records() {
        total += r.salary_usd;
        max = max.max(r.salary_usd);
        *role_counts.entry(r.role.as_str()).or_default() += 1;
    }

    // BTreeMap iterates in ascending order, so a strict `>` keeps the
    // smallest role among equally frequent ones.
    let mut mode: Option<(&str, usize)> = None;
    for (role, count) in role_counts {
        if mode.is_none_or(|(_, best)| count > best) {
            mode = Some((role, count));
        }
    }

    SummaryMetrics {
        mean_salary: total / view.len() as f64,
        max_salary: max,
        record_count: view.len(),
        most_frequent_role: mode.map(|(role, _)| role.to_string()).unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// Mean salary of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub key: String,
    pub mean_salary: f64,
    pub count: usize,
}

fn group_means<'a, I, K>(rows: I, key: K) -> Vec<GroupMean>
where
    I: Iterator<Item = &'a super::model::Record>,
    K: Fn(&'a super::model::Record) -> &'a str,
{
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in rows {
        let entry = groups.entry(key(r)).or_insert((0.0, 0));
        entry.0 += r.salary_usd;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(k, (sum, count))| GroupMean {
            key: k.to_string(),
            mean_salary: sum / count as f64,
            count,
        })
        .collect()
}

/// The `n` roles with the highest mean salary, returned lowest-to-highest.
///
/// Selection breaks equal means by role name (smaller name ranks higher);
/// the returned order is the exact reverse of the selection ranking.
pub fn top_roles_by_mean(view: &FilteredView<'_>, n: usize) -> Vec<GroupMean> {
    let mut groups = group_means(view.records(), |r| r.role.as_str());
    groups.sort_by(|a, b| {
        b.mean_salary
            .total_cmp(&a.mean_salary)
            .then_with(|| a.key.cmp(&b.key))
    });
    groups.truncate(n);
    groups.reverse();
    groups
}

/// Mean salary per residence country among records holding `role`.
///
/// Countries without a matching record are absent, never zero-filled.
/// Sorted by country code.
pub fn country_means_for_role(view: &FilteredView<'_>, role: &str) -> Vec<GroupMean> {
    group_means(
        view.records().filter(|r| r.role == role),
        |r| r.residence_country_code.as_str(),
    )
}

// ---------------------------------------------------------------------------
// Salary distribution
// ---------------------------------------------------------------------------

/// Equal-width histogram over the observed salary range.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

/// One histogram bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

impl Histogram {
    /// Bin salaries into `n_bins` bins spanning `[min, max]`.
    ///
    /// Bins are half-open except the last, which also holds `max`. No values
    /// give zero bins; a single distinct value gives one bin of zero width.
    pub fn build(values: impl IntoIterator<Item = f64>, n_bins: usize) -> Self {
        let values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() || n_bins == 0 {
            return Histogram {
                min: 0.0,
                max: 0.0,
                bin_width: 0.0,
                counts: Vec::new(),
            };
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        if range <= 0.0 {
            return Histogram {
                min,
                max,
                bin_width: 0.0,
                counts: vec![values.len()],
            };
        }

        let bin_width = range / n_bins as f64;
        let mut counts = vec![0usize; n_bins];
        for v in values {
            let idx = (((v - min) / bin_width).floor() as usize).min(n_bins - 1);
            counts[idx] += 1;
        }
        Histogram {
            min,
            max,
            bin_width,
            counts,
        }
    }

    /// Total number of binned values.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn bins(&self) -> impl Iterator<Item = Bin> + '_ {
        self.counts.iter().enumerate().map(move |(i, &count)| {
            let lo = self.min + i as f64 * self.bin_width;
            let hi = if i + 1 == self.counts.len() {
                self.max
            } else {
                lo + self.bin_width
            };
            Bin { lo, hi, count }
        })
    }
}

pub fn salary_distribution(view: &FilteredView<'_>) -> Histogram {
    Histogram::build(view.records().map(|r| r.salary_usd), HISTOGRAM_BINS)
}

// ---------------------------------------------------------------------------
// Remote-type proportions
// ---------------------------------------------------------------------------

/// Number of records with one work arrangement.
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub label: String,
    pub count: usize,
    /// Fraction of all records in the view, in `[0, 1]`.
    pub fraction: f64,
}

/// Count records per `remote_type`, largest group first (ties by name).
pub fn remote_shares(view: &FilteredView<'_>) -> Vec<Share> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in view.records() {
        *counts.entry(r.remote_type.as_str()).or_default() += 1;
    }
    let total = view.len();
    let mut shares: Vec<Share> = counts
        .into_iter()
        .map(|(label, count)| Share {
            label: label.to_string(),
            count,
            fraction: count as f64 / total as f64,
        })
        .collect();
    shares.sort_by(|a, b| match b.count.cmp(&a.count) {
        Ordering::Equal => a.label.cmp(&b.label),
        other => other,
    });
    shares
}

// ---------------------------------------------------------------------------
// All views of one recomputation
// ---------------------------------------------------------------------------

/// Everything the presentation draws for one selection.
///
/// Chart views are `None` when the filtered view is empty, which tells the
/// presentation to show a "no data" notice instead of a chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardViews {
    pub summary: SummaryMetrics,
    pub top_roles: Option<Vec<GroupMean>>,
    pub distribution: Option<Histogram>,
    pub remote_shares: Option<Vec<Share>>,
    pub country_means: Option<Vec<GroupMean>>,
}

impl DashboardViews {
    pub fn compute(view: &FilteredView<'_>, target_role: &str) -> Self {
        let summary = summarize(view);
        if view.is_empty() {
            return DashboardViews {
                summary,
                ..Default::default()
            };
        }
        DashboardViews {
            summary,
            top_roles: Some(top_roles_by_mean(view, TOP_ROLES)),
            distribution: Some(salary_distribution(view)),
            remote_shares: Some(remote_shares(view)),
            country_means: Some(country_means_for_role(view, target_role)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, FilterSelection};
    use crate::data::model::fixtures::record;
    use crate::data::model::{Dataset, Record};
    use proptest::prelude::*;

    fn full_view(ds: &Dataset) -> FilteredView<'_> {
        filter(ds, &FilterSelection::all(&ds.options))
    }

    fn with_remote(mut r: Record, remote: &str) -> Record {
        r.remote_type = remote.to_string();
        r
    }

    fn with_country(mut r: Record, iso3: &str) -> Record {
        r.residence_country_code = iso3.to_string();
        r
    }

    #[test]
    fn test_summary_of_empty_view_is_zero_state() {
        let ds = Dataset::from_records(vec![record(2022, "Senior", "A", 100.0)]);
        let view = filter(&ds, &FilterSelection::default());
        let s = summarize(&view);
        assert_eq!(s.mean_salary, 0.0);
        assert_eq!(s.max_salary, 0.0);
        assert_eq!(s.record_count, 0);
        assert_eq!(s.most_frequent_role, "");
    }

    #[test]
    fn test_summary_values() {
        let ds = Dataset::from_records(vec![
            record(2022, "Senior", "B", 100.0),
            record(2022, "Senior", "A", 300.0),
            record(2022, "Senior", "B", 200.0),
        ]);
        let s = summarize(&full_view(&ds));
        assert_eq!(s.mean_salary, 200.0);
        assert_eq!(s.max_salary, 300.0);
        assert_eq!(s.record_count, 3);
        assert_eq!(s.most_frequent_role, "B");
    }

    #[test]
    fn test_mode_tie_goes_to_smallest_role() {
        let ds = Dataset::from_records(vec![
            record(2022, "Senior", "Zeta", 1.0),
            record(2022, "Senior", "Alpha", 1.0),
            record(2022, "Senior", "Zeta", 1.0),
            record(2022, "Senior", "Alpha", 1.0),
        ]);
        assert_eq!(summarize(&full_view(&ds)).most_frequent_role, "Alpha");
    }

    #[test]
    fn test_top_roles_example_ordering() {
        let ds = Dataset::from_records(vec![
            record(2022, "Senior", "A", 100.0),
            record(2022, "Senior", "A", 300.0),
            record(2022, "Senior", "B", 200.0),
        ]);
        let top = top_roles_by_mean(&full_view(&ds), TOP_ROLES);
        let got: Vec<(&str, f64)> = top.iter().map(|g| (g.key.as_str(), g.mean_salary)).collect();
        assert_eq!(got, vec![("B", 200.0), ("A", 200.0)]);
        assert_eq!(top[1].count, 2);
    }

    #[test]
    fn test_top_roles_keeps_highest_ten() {
        let records: Vec<Record> = (0..15)
            .map(|i| record(2022, "Senior", &format!("Role{i:02}"), 1000.0 * i as f64))
            .collect();
        let ds = Dataset::from_records(records);
        let top = top_roles_by_mean(&full_view(&ds), TOP_ROLES);
        assert_eq!(top.len(), 10);
        assert_eq!(top.first().map(|g| g.key.as_str()), Some("Role05"));
        assert_eq!(top.last().map(|g| g.key.as_str()), Some("Role14"));
    }

    #[test]
    fn test_histogram_bin_edges() {
        let values = [10_000.0, 25_000.0, 39_999.0, 40_000.0];
        let h = Histogram::build(values, 30);
        assert_eq!(h.counts.len(), 30);
        assert_eq!(h.bin_width, 1000.0);
        assert_eq!(h.counts[0], 1);
        assert_eq!(h.counts[15], 1);
        // 39_999 and the maximum both land in the last bin.
        assert_eq!(h.counts[29], 2);
        assert_eq!(h.total(), 4);

        let last = h.bins().last().unwrap();
        assert_eq!(last.lo, 39_000.0);
        assert_eq!(last.hi, 40_000.0);
    }

    #[test]
    fn test_histogram_degenerate_inputs() {
        let empty = Histogram::build(std::iter::empty(), 30);
        assert!(empty.counts.is_empty());
        assert_eq!(empty.bins().count(), 0);

        let flat = Histogram::build([5.0, 5.0, 5.0], 30);
        assert_eq!(flat.counts, vec![3]);
        assert_eq!(flat.bin_width, 0.0);
        let bin = flat.bins().next().unwrap();
        assert_eq!((bin.lo, bin.hi, bin.count), (5.0, 5.0, 3));
    }

    #[test]
    fn test_remote_shares_sorted_and_sum_to_count() {
        let ds = Dataset::from_records(vec![
            with_remote(record(2022, "Senior", "A", 1.0), "Remote"),
            with_remote(record(2022, "Senior", "A", 1.0), "On-site"),
            with_remote(record(2022, "Senior", "A", 1.0), "Remote"),
            with_remote(record(2022, "Senior", "A", 1.0), "Hybrid"),
        ]);
        let shares = remote_shares(&full_view(&ds));
        let labels: Vec<&str> = shares.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Remote", "Hybrid", "On-site"]);
        assert_eq!(shares[0].fraction, 0.5);
        assert_eq!(shares.iter().map(|s| s.count).sum::<usize>(), 4);
    }

    #[test]
    fn test_country_means_only_for_target_role() {
        let ds = Dataset::from_records(vec![
            with_country(record(2022, "Senior", "Data Scientist", 100.0), "USA"),
            with_country(record(2022, "Senior", "Data Scientist", 300.0), "USA"),
            with_country(record(2022, "Senior", "Data Scientist", 50.0), "BRA"),
            with_country(record(2022, "Senior", "Data Engineer", 999.0), "DEU"),
        ]);
        let means = country_means_for_role(&full_view(&ds), "Data Scientist");
        let got: Vec<(&str, f64)> = means.iter().map(|g| (g.key.as_str(), g.mean_salary)).collect();
        assert_eq!(got, vec![("BRA", 50.0), ("USA", 200.0)]);
        assert!(means.iter().all(|g| g.key != "DEU"));

        let engineers = country_means_for_role(&full_view(&ds), "Data Engineer");
        assert_eq!(engineers.len(), 1);
    }

    #[test]
    fn test_dashboard_views_signal_no_data() {
        let ds = Dataset::from_records(vec![record(2022, "Senior", "A", 1.0)]);
        let empty = filter(&ds, &FilterSelection::default());
        let views = DashboardViews::compute(&empty, "Data Scientist");
        assert_eq!(views.summary, SummaryMetrics::default());
        assert!(views.top_roles.is_none());
        assert!(views.distribution.is_none());
        assert!(views.remote_shares.is_none());
        assert!(views.country_means.is_none());

        let views = DashboardViews::compute(&full_view(&ds), "Data Scientist");
        assert!(views.top_roles.is_some());
        assert_eq!(views.distribution.map(|h| h.counts), Some(vec![1]));
        // No matching role is not the same as no data.
        assert_eq!(views.country_means, Some(Vec::new()));
    }

    #[test]
    fn test_end_to_end_year_filter() {
        let ds = Dataset::from_records(vec![
            record(2021, "Junior", "A", 10.0),
            record(2022, "Junior", "B", 20.0),
            record(2021, "Senior", "A", 30.0),
            record(2022, "Senior", "B", 40.0),
        ]);
        let mut sel = FilterSelection::all(&ds.options);
        sel.years = [2022].into_iter().collect();
        let view = filter(&ds, &sel);
        assert!(view.records().all(|r| r.year == 2022));
        let views = DashboardViews::compute(&view, "B");
        assert_eq!(views.summary.record_count, 2);
        assert_eq!(views.summary.mean_salary, 30.0);
        assert_eq!(views.summary.most_frequent_role, "B");
    }

    fn arb_records() -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"]),
                prop::sample::select(vec!["Remote", "Hybrid", "On-site"]),
                0.0f64..400_000.0,
            )
                .prop_map(|(role, remote, usd)| with_remote(record(2022, "Senior", role, usd), remote)),
            0..60,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_remote_counts_sum_to_record_count(records in arb_records()) {
            let ds = Dataset::from_records(records);
            let view = full_view(&ds);
            let total: usize = remote_shares(&view).iter().map(|s| s.count).sum();
            prop_assert_eq!(total, summarize(&view).record_count);
        }

        #[test]
        fn prop_top_roles_bounded_and_ascending(records in arb_records()) {
            let ds = Dataset::from_records(records);
            let top = top_roles_by_mean(&full_view(&ds), TOP_ROLES);
            prop_assert!(top.len() <= TOP_ROLES);
            for pair in top.windows(2) {
                prop_assert!(pair[0].mean_salary <= pair[1].mean_salary);
            }
        }

        #[test]
        fn prop_histogram_counts_every_value(values in prop::collection::vec(0.0f64..1e6, 0..100)) {
            let h = Histogram::build(values.iter().copied(), HISTOGRAM_BINS);
            prop_assert_eq!(h.total(), values.len());
            prop_assert!(h.counts.len() <= HISTOGRAM_BINS);
        }
    }
}
