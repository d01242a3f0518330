//! Panel CSV loading and CSV/JSON export of pipeline results.

use crate::error::{Error, Result};
use crate::models::{Metric, PanelRow};
use crate::normalize::NameMap;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, WriterBuilder};
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::OnceLock;

/// One CSV record before year reduction and number parsing.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(default)]
    pop: Option<String>,
    #[serde(default)]
    hydro_ej: Option<String>,
    #[serde(default)]
    nuclear_ej: Option<String>,
    #[serde(default)]
    ren_power_ej: Option<String>,
    #[serde(default)]
    solar_ej: Option<String>,
    #[serde(default)]
    renewables_ej: Option<String>,
}

/// Cells read as missing, matching the default NA set of common CSV tooling.
const MISSING_MARKERS: [&str; 14] = [
    "#n/a", "#n/a n/a", "#na", "-1.#ind", "-1.#qnan", "1.#ind", "1.#qnan", "<na>", "n/a", "na",
    "null", "nan", "-nan", "none",
];

static YEAR_NUMBER: OnceLock<Option<Regex>> = OnceLock::new();
static YEAR_DATE_PREFIX: OnceLock<Option<Regex>> = OnceLock::new();

fn year_number() -> Option<&'static Regex> {
    YEAR_NUMBER
        .get_or_init(|| Regex::new(r"^(\d{4})(?:\.0*)?$").ok())
        .as_ref()
}

fn year_date_prefix() -> Option<&'static Regex> {
    YEAR_DATE_PREFIX
        .get_or_init(|| Regex::new(r"^(\d{4})[-/T ]").ok())
        .as_ref()
}

/// Reduce a year-precision date cell to its 4-digit year.
///
/// Accepts `2000`, `2000.0`, `2000-01-01`, `2000-01-01 00:00:00` and other
/// date-shaped strings that open with a 4-digit year and a `-`, `/`, `T` or
/// space. Fractional or exponent numbers (`2000.5`, `1e3`) are rejected.
pub fn parse_year(raw: &str) -> Option<i32> {
    let s = raw.trim();
    if let Some(c) = year_number().and_then(|re| re.captures(s)) {
        return c[1].parse().ok();
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.year());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.year());
        }
    }
    year_date_prefix()
        .and_then(|re| re.captures(s))
        .and_then(|c| c[1].parse().ok())
}

fn is_missing(s: &str) -> bool {
    s.is_empty() || MISSING_MARKERS.iter().any(|m| s.eq_ignore_ascii_case(m))
}

/// Parse one metric cell. Blank cells and NA markers (`NA`, `N/A`, `NULL`,
/// `None`, `#N/A`, `<NA>`, `NaN`, ...) are missing.
fn parse_metric(raw: Option<&str>, column: &'static str, line: u64) -> Result<Option<f64>> {
    let Some(s) = raw.map(str::trim) else {
        return Ok(None);
    };
    if is_missing(s) {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .map_err(|_| Error::Number {
            line,
            column,
            raw: s.to_string(),
        })
}

fn convert(raw: RawRow, line: u64) -> Result<PanelRow> {
    let year = parse_year(&raw.year).ok_or_else(|| Error::Year {
        line,
        raw: raw.year.clone(),
    })?;
    let metric = |cell: &Option<String>, m: Metric| parse_metric(cell.as_deref(), m.column(), line);
    Ok(PanelRow {
        country: raw.country.trim().to_string(),
        year,
        region: raw.region.trim().to_string(),
        population: metric(&raw.pop, Metric::Population)?,
        hydro_ej: metric(&raw.hydro_ej, Metric::Hydro)?,
        nuclear_ej: metric(&raw.nuclear_ej, Metric::Nuclear)?,
        ren_power_ej: metric(&raw.ren_power_ej, Metric::RenPower)?,
        solar_ej: metric(&raw.solar_ej, Metric::Solar)?,
        renewables_ej: metric(&raw.renewables_ej, Metric::Renewables)?,
    })
}

/// Read panel rows from any CSV source and normalize country names with `names`.
pub fn load_panel_reader<R: Read>(reader: R, names: &NameMap) -> Result<Vec<PanelRow>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<RawRow>().enumerate() {
        // header is line 1
        let line = idx as u64 + 2;
        rows.push(convert(rec?, line)?);
    }
    let changed = names.apply(&mut rows);
    info!("loaded {} panel rows ({} country names normalized)", rows.len(), changed);
    if rows.is_empty() {
        warn!("panel dataset is empty");
    }
    Ok(rows)
}

/// Load the panel CSV at `path` using the built-in name corrections.
pub fn load_panel_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PanelRow>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_panel_reader(file, NameMap::builtin())
}

/// Neutralize spreadsheet formulas in a text cell.
fn safe_cell(s: &str) -> String {
    if s.starts_with(['=', '+', '-', '@']) {
        format!("'{}", s)
    } else {
        s.to_string()
    }
}

/// Save panel rows as CSV with the panel's own header.
pub fn save_csv<P: AsRef<Path>>(rows: &[PanelRow], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    let mut header = vec!["Country", "Year", "Region"];
    header.extend(Metric::ALL.iter().map(|m| m.column()));
    wtr.write_record(&header)?;
    for r in rows {
        wtr.serialize((
            safe_cell(&r.country),
            r.year,
            safe_cell(&r.region),
            r.population,
            r.hydro_ej,
            r.nuclear_ej,
            r.ren_power_ej,
            r.solar_ej,
            r.renewables_ej,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save any serializable result (rows, aggregates, a view model) as pretty JSON.
pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
