//! The full recomputation pass: one user interaction in, one view model out.
//!
//! [`Context`] holds the normalized panel and is built once at startup.
//! [`render`] is a pure function of the context and the current
//! [`SelectionState`], so calling it twice with the same inputs gives
//! identical output.

use crate::aggregate::{self, GroupTotals, RegionMean};
use crate::filter;
use crate::models::{CountryKey, EnergyType, Metric, PanelRow, Selection};
use crate::normalize::NameMap;
use crate::selection::{self, ClickEvent, MatchStatus};
use crate::series::{self, CategorySeries, Series};
use log::info;
use serde::Serialize;

/// Leaderboard length.
pub const TOP_N: usize = 5;
/// Most energy types the combined chart overlays.
pub const MAX_MIX: usize = 4;
/// Metrics summed in the world views.
pub const WORLD_METRICS: [Metric; 4] = [
    Metric::Hydro,
    Metric::Nuclear,
    Metric::Solar,
    Metric::Renewables,
];

/// Read-only dataset shared by every render call.
#[derive(Debug, Clone, Default)]
pub struct Context {
    rows: Vec<PanelRow>,
}

impl Context {
    /// Normalize country names with `names` and take ownership of the rows.
    pub fn new(mut rows: Vec<PanelRow>, names: &NameMap) -> Self {
        let changed = names.apply(&mut rows);
        info!("context ready: {} rows, {} names normalized", rows.len(), changed);
        Self { rows }
    }

    /// Wrap rows whose country names are already normalized.
    pub fn from_normalized(rows: Vec<PanelRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    /// Region choices, first-occurrence order.
    pub fn regions(&self) -> Vec<String> {
        filter::distinct(&self.rows, |r| r.region.clone())
    }

    /// Year choices, first-occurrence order.
    pub fn years(&self) -> Vec<i32> {
        filter::distinct(&self.rows, |r| r.year)
    }
}

/// Everything the user has picked on the page.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// Last map interaction, as reported by the widget.
    pub click: Option<ClickEvent>,
    /// Defaults to the first region in the data.
    pub region: Option<String>,
    /// Defaults to the first year in the data.
    pub year: Option<i32>,
    /// Leaderboard metric. Defaults to hydro.
    pub energy: Option<EnergyType>,
    /// Energy types for the combined country chart.
    pub mix: Vec<EnergyType>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CountryView {
    NoSelection,
    NoData {
        country: CountryKey,
    },
    Data {
        country: CountryKey,
        population: Series,
        energy_mix: Vec<Series>,
    },
}

impl CountryView {
    /// Status line shown above the country charts.
    pub fn message(&self) -> String {
        match self {
            CountryView::NoSelection => "No country selected.".to_string(),
            CountryView::NoData { country } => format!("No available data for {}", country),
            CountryView::Data { country, .. } => format!("Selected Country: {}", country),
        }
    }

    pub fn has_data(&self) -> bool {
        matches!(self, CountryView::Data { .. })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegionView {
    pub region: String,
    pub year: i32,
    pub energy: EnergyType,
    pub title: String,
    pub top: Vec<PanelRow>,
    pub chart: CategorySeries,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorldView {
    pub population_means: Vec<RegionMean>,
    pub population_chart: CategorySeries,
    /// Region totals for the selected year; empty without a year.
    pub region_totals: Vec<GroupTotals<String>>,
    pub region_chart: Vec<CategorySeries>,
    pub yearly_totals: Vec<GroupTotals<i32>>,
    pub yearly_chart: Vec<CategorySeries>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Section {
    pub anchor: &'static str,
    pub title: &'static str,
    pub depth: u8,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ViewModel {
    pub selection: Selection,
    pub country: CountryView,
    /// `None` only when the dataset has no regions or years.
    pub region: Option<RegionView>,
    pub world: WorldView,
}

impl ViewModel {
    /// Navigation entries. Country subsections only appear with country data.
    pub fn sections(&self) -> Vec<Section> {
        let s = |anchor, title, depth| Section { anchor, title, depth };
        let mut out = vec![s("section1", "Analysis of clean energy in a country", 0)];
        if self.country.has_data() {
            out.push(s("subsection1.1", "Population Over Time", 1));
            out.push(s("subsection1.2", "Clean Energy Over Time", 1));
        }
        out.extend([
            s("section2", "Analysis of clean energy in a Region", 0),
            s("subsection2.1", "Top Energy Producers in a Region", 1),
            s("section3", "Analysis of clean energy in the world", 0),
            s("subsection3.1", "Average Population of the countries Per Region", 1),
            s("subsection3.2", "Clean Energy Production by Region", 1),
            s("subsection3.3", "Clean Energy Production over the time", 1),
        ]);
        out
    }
}

/// Recompute every view for the current selection.
pub fn render(ctx: &Context, state: &SelectionState) -> ViewModel {
    let selection = selection::resolve(state.click.as_ref());
    let country = country_view(ctx, &selection, &state.mix);

    let year = state.year.or_else(|| ctx.years().first().copied());
    let region_name = state
        .region
        .clone()
        .or_else(|| ctx.regions().into_iter().next());
    let energy = state.energy.unwrap_or(EnergyType::Hydro);
    let region = match (region_name, year) {
        (Some(r), Some(y)) => Some(region_view(ctx, r, y, energy)),
        _ => None,
    };

    ViewModel {
        selection,
        country,
        region,
        world: world_view(ctx, year),
    }
}

fn country_view(ctx: &Context, selection: &Selection, mix: &[EnergyType]) -> CountryView {
    let Some(key) = selection.country() else {
        return CountryView::NoSelection;
    };
    if selection::classify(key, ctx.rows()) == MatchStatus::Unmatched {
        return CountryView::NoData {
            country: key.clone(),
        };
    }
    let rows = filter::by_country(ctx.rows(), key);
    CountryView::Data {
        country: key.clone(),
        population: series::to_series(&rows, Metric::Population, "Population"),
        energy_mix: series::combined(&rows, &limit_mix(mix)),
    }
}

/// Drop repeats and cap at [`MAX_MIX`], keeping pick order.
pub fn limit_mix(mix: &[EnergyType]) -> Vec<EnergyType> {
    let mut out: Vec<EnergyType> = Vec::with_capacity(MAX_MIX);
    for t in mix {
        if out.len() == MAX_MIX {
            break;
        }
        if !out.contains(t) {
            out.push(*t);
        }
    }
    out
}

fn region_view(ctx: &Context, region: String, year: i32, energy: EnergyType) -> RegionView {
    let slice = filter::by_region_year(ctx.rows(), &region, year);
    let top = aggregate::top_n(&slice, energy.metric(), TOP_N);
    let chart = series::leaderboard(&top, energy.metric());
    RegionView {
        title: format!(
            "Top {} Producers of {} in {} ({})",
            TOP_N,
            energy.production_label(),
            region,
            year
        ),
        region,
        year,
        energy,
        top,
        chart,
    }
}

fn world_view(ctx: &Context, year: Option<i32>) -> WorldView {
    let population_means = aggregate::mean_by_region(ctx.rows(), Metric::Population);
    let population_chart = series::region_means(&population_means, Metric::Population.column());
    let region_totals = match year {
        Some(y) => aggregate::sum_by_region(ctx.rows(), y, &WORLD_METRICS),
        None => Vec::new(),
    };
    let yearly_totals = aggregate::sum_by_year(ctx.rows(), &WORLD_METRICS);
    WorldView {
        region_chart: series::totals_series(&region_totals, &WORLD_METRICS),
        yearly_chart: series::totals_series(&yearly_totals, &WORLD_METRICS),
        population_means,
        population_chart,
        region_totals,
        yearly_totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_is_deduped_and_capped() {
        use EnergyType::*;
        assert_eq!(
            limit_mix(&[Solar, Hydro, Solar, Nuclear, Renewable, Hydro]),
            vec![Solar, Hydro, Nuclear, Renewable]
        );
        assert!(limit_mix(&[]).is_empty());
    }

    #[test]
    fn empty_context_renders_without_region() {
        let vm = render(&Context::default(), &SelectionState::default());
        assert_eq!(vm.country, CountryView::NoSelection);
        assert!(vm.region.is_none());
        assert!(vm.world.yearly_totals.is_empty());
    }
}
