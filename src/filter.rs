//! Row filters over the panel. Each returns a fresh table and leaves the
//! source untouched; matching is exact string/year equality and row order is
//! the source order.

use crate::models::{CountryKey, PanelRow};

/// Rows for one country. An unknown key gives an empty table, not an error.
pub fn by_country(rows: &[PanelRow], key: &CountryKey) -> Vec<PanelRow> {
    select(rows, |r| r.country == key.as_str())
}

/// Rows of `region` observed in `year`.
pub fn by_region_year(rows: &[PanelRow], region: &str, year: i32) -> Vec<PanelRow> {
    select(rows, |r| r.region == region && r.year == year)
}

/// Rows observed in `year`, all regions.
pub fn by_year(rows: &[PanelRow], year: i32) -> Vec<PanelRow> {
    select(rows, |r| r.year == year)
}

fn select<F>(rows: &[PanelRow], keep: F) -> Vec<PanelRow>
where
    F: Fn(&PanelRow) -> bool,
{
    rows.iter().filter(|r| keep(r)).cloned().collect()
}

/// Distinct values of a column in first-occurrence order.
pub(crate) fn distinct<T, F>(rows: &[PanelRow], field: F) -> Vec<T>
where
    T: PartialEq,
    F: Fn(&PanelRow) -> T,
{
    let mut out: Vec<T> = Vec::new();
    for r in rows {
        let v = field(r);
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}
