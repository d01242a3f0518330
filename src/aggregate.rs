//! Ranking and grouping over panel tables.
//!
//! Missing values are handled differently depending on the operation:
//! - ranking and means skip them, so a missing reading never drags an
//!   average down and never appears on a leaderboard;
//! - sums count them as zero, so one missing reading never blanks a total.
//!
//! A group whose values are all missing therefore has mean `None` and sum `0.0`.

use crate::filter;
use crate::models::{Metric, PanelRow};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Totals of several metrics for one group (a region or a year).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupTotals<K> {
    pub key: K,
    /// One entry per requested metric, in request order.
    pub totals: Vec<(Metric, f64)>,
}

impl<K> GroupTotals<K> {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.totals.iter().find(|(m, _)| *m == metric).map(|(_, v)| *v)
    }
}

/// Mean of one metric for one region; `None` when the region has no values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionMean {
    pub region: String,
    pub mean: Option<f64>,
}

/// The `n` rows with the largest `metric`, largest first.
///
/// Rows missing `metric` are dropped. The sort is stable, so rows with equal
/// values keep their relative order from `rows`.
pub fn top_n(rows: &[PanelRow], metric: Metric, n: usize) -> Vec<PanelRow> {
    let mut ranked: Vec<(&PanelRow, f64)> = rows
        .iter()
        .filter_map(|r| r.get(metric).map(|v| (r, v)))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    ranked.into_iter().map(|(r, _)| r.clone()).collect()
}

/// Mean of `metric` per region, regions in ascending order.
pub fn mean_by_region(rows: &[PanelRow], metric: Metric) -> Vec<RegionMean> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in rows {
        let acc = groups.entry(r.region.as_str()).or_insert((0.0, 0));
        if let Some(v) = r.get(metric) {
            acc.0 += v;
            acc.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(region, (sum, count))| RegionMean {
            region: region.to_string(),
            mean: (count > 0).then(|| sum / count as f64),
        })
        .collect()
}

/// Per-region totals of `metrics` for `year`, regions in ascending order.
pub fn sum_by_region(rows: &[PanelRow], year: i32, metrics: &[Metric]) -> Vec<GroupTotals<String>> {
    let in_year = filter::by_year(rows, year);
    let out = totals(in_year.iter(), |r| r.region.clone(), metrics);
    if out.is_empty() {
        debug!("no rows for year {}; region totals are empty", year);
    }
    out
}

/// Per-year totals of `metrics` over every row, years ascending.
pub fn sum_by_year(rows: &[PanelRow], metrics: &[Metric]) -> Vec<GroupTotals<i32>> {
    totals(rows.iter(), |r| r.year, metrics)
}

fn totals<'a, K, I, F>(rows: I, key: F, metrics: &[Metric]) -> Vec<GroupTotals<K>>
where
    K: Ord,
    I: Iterator<Item = &'a PanelRow>,
    F: Fn(&PanelRow) -> K,
{
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for r in rows {
        let sums = groups
            .entry(key(r))
            .or_insert_with(|| vec![0.0; metrics.len()]);
        for (slot, m) in sums.iter_mut().zip(metrics) {
            *slot += r.get(*m).unwrap_or(0.0);
        }
    }
    groups
        .into_iter()
        .map(|(key, sums)| GroupTotals {
            key,
            totals: metrics.iter().copied().zip(sums).collect(),
        })
        .collect()
}

/// Summary statistics of one metric for one country.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub country: String,
    pub metric: Metric,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Per-country statistics of `metric`, countries in ascending order.
pub fn summary_by_country(rows: &[PanelRow], metric: Metric) -> Vec<Summary> {
    let mut groups: BTreeMap<&str, (Vec<f64>, usize)> = BTreeMap::new();
    for r in rows {
        let entry = groups.entry(r.country.as_str()).or_default();
        match r.get(metric) {
            Some(v) => entry.0.push(v),
            None => entry.1 += 1,
        }
    }

    let mut out = Vec::new();
    for (country, (mut vals, missing)) in groups {
        vals.sort_by(|a, b| a.total_cmp(b));
        let count = vals.len();
        let mean = (count > 0).then(|| vals.iter().sum::<f64>() / count as f64);
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(Summary {
            country: country.to_string(),
            metric,
            count,
            missing,
            min: vals.first().copied(),
            max: vals.last().copied(),
            mean,
            median,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(country: &str, region: &str, year: i32, hydro: Option<f64>) -> PanelRow {
        PanelRow {
            country: country.into(),
            year,
            region: region.into(),
            population: None,
            hydro_ej: hydro,
            nuclear_ej: None,
            ren_power_ej: None,
            solar_ej: None,
            renewables_ej: None,
        }
    }

    #[test]
    fn top_n_is_stable_on_ties() {
        let rows = vec![
            row("A", "R", 2000, Some(1.0)),
            row("B", "R", 2000, Some(2.0)),
            row("C", "R", 2000, Some(1.0)),
            row("D", "R", 2000, None),
        ];
        let got: Vec<String> = top_n(&rows, Metric::Hydro, 5)
            .into_iter()
            .map(|r| r.country)
            .collect();
        assert_eq!(got, vec!["B", "A", "C"]);
    }

    #[test]
    fn top_n_truncates() {
        let rows: Vec<PanelRow> = (0..8)
            .map(|i| row(&format!("C{i}"), "R", 2000, Some(i as f64)))
            .collect();
        let got = top_n(&rows, Metric::Hydro, 5);
        assert_eq!(got.len(), 5);
        assert_eq!(got[0].country, "C7");
        assert_eq!(got[4].country, "C3");
        assert!(top_n(&rows, Metric::Hydro, 0).is_empty());
    }

    #[test]
    fn all_missing_region_mean_none_sum_zero() {
        let rows = vec![
            row("A", "Empty", 2010, None),
            row("B", "Full", 2010, Some(0.0)),
        ];
        let means = mean_by_region(&rows, Metric::Hydro);
        assert_eq!(means[0].region, "Empty");
        assert_eq!(means[0].mean, None);
        assert_eq!(means[1].mean, Some(0.0));

        let sums = sum_by_region(&rows, 2010, &[Metric::Hydro]);
        assert_eq!(sums[0].key, "Empty");
        assert_eq!(sums[0].get(Metric::Hydro), Some(0.0));
    }

    #[test]
    fn region_totals_only_count_the_requested_year() {
        let rows = vec![
            row("A", "R", 2009, Some(100.0)),
            row("B", "R", 2010, Some(2.0)),
            row("C", "S", 2011, Some(7.0)),
        ];
        let sums = sum_by_region(&rows, 2010, &[Metric::Hydro]);
        assert_eq!(sums.len(), 1);
        assert_eq!(sums[0].key, "R");
        assert_eq!(sums[0].get(Metric::Hydro), Some(2.0));
        assert!(sum_by_region(&rows, 1990, &[Metric::Hydro]).is_empty());
    }

    #[test]
    fn sum_by_year_is_ascending() {
        let rows = vec![
            row("A", "R", 2001, Some(1.0)),
            row("B", "S", 2000, Some(2.0)),
            row("C", "S", 2001, Some(3.0)),
        ];
        let got = sum_by_year(&rows, &[Metric::Hydro, Metric::Solar]);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].key, 2000);
        assert_eq!(got[1].totals, vec![(Metric::Hydro, 4.0), (Metric::Solar, 0.0)]);
    }

    #[test]
    fn summary_counts_missing() {
        let rows = vec![
            row("A", "R", 2000, Some(10.0)),
            row("A", "R", 2001, None),
            row("A", "R", 2002, Some(30.0)),
        ];
        let s = &summary_by_country(&rows, Metric::Hydro)[0];
        assert_eq!((s.count, s.missing), (2, 1));
        assert_eq!(s.median, Some(20.0));
        assert_eq!(s.min, Some(10.0));
    }
}
