//! Shape tables into chart-ready series.

use crate::aggregate::{GroupTotals, RegionMean};
use crate::models::{EnergyType, Metric, PanelRow};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    pub x: i32,
    /// `None` where the row has no value; renderers draw a gap.
    pub y: Option<f64>,
}

/// One named (year, value) series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
    /// Point to annotate as "Latest Value".
    pub latest: Option<SeriesPoint>,
}

impl Series {
    pub fn xs(&self) -> Vec<i32> {
        self.points.iter().map(|p| p.x).collect()
    }
}

/// Year/`metric` series over `rows`, in row order.
pub fn to_series(rows: &[PanelRow], metric: Metric, name: impl Into<String>) -> Series {
    let points: Vec<SeriesPoint> = rows
        .iter()
        .map(|r| SeriesPoint {
            x: r.year,
            y: r.get(metric),
        })
        .collect();
    let latest = latest_point(&points);
    Series {
        name: name.into(),
        points,
        latest,
    }
}

/// Point with the largest x; on ties the last one wins.
pub fn latest_point(points: &[SeriesPoint]) -> Option<SeriesPoint> {
    points
        .iter()
        .copied()
        .reduce(|best, p| if p.x >= best.x { p } else { best })
}

/// One series per energy type, all on the same x domain, for overlaying.
pub fn combined(rows: &[PanelRow], types: &[EnergyType]) -> Vec<Series> {
    types
        .iter()
        .map(|t| to_series(rows, t.metric(), t.label()))
        .collect()
}

/// One named series over categorical x values (a bar chart trace).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySeries {
    pub name: String,
    pub points: Vec<(String, Option<f64>)>,
}

/// Leaderboard bars: country against `metric`.
pub fn leaderboard(top: &[PanelRow], metric: Metric) -> CategorySeries {
    CategorySeries {
        name: metric.column().to_string(),
        points: top
            .iter()
            .map(|r| (r.country.clone(), r.get(metric)))
            .collect(),
    }
}

pub fn region_means(means: &[RegionMean], name: impl Into<String>) -> CategorySeries {
    CategorySeries {
        name: name.into(),
        points: means.iter().map(|m| (m.region.clone(), m.mean)).collect(),
    }
}

/// Split grouped totals into one series per metric, sharing the group keys.
pub fn totals_series<K: Display>(groups: &[GroupTotals<K>], metrics: &[Metric]) -> Vec<CategorySeries> {
    metrics
        .iter()
        .map(|m| CategorySeries {
            name: m.column().to_string(),
            points: groups.iter().map(|g| (g.key.to_string(), g.get(*m))).collect(),
        })
        .collect()
}
