use serde::{Deserialize, Serialize};
use std::fmt;

/// One (country, year) observation of the clean-energy panel.
///
/// Energy metrics are in exajoules; `pop` is in millions. Any metric may be
/// missing for a given row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelRow {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "pop")]
    pub population: Option<f64>,
    pub hydro_ej: Option<f64>,
    pub nuclear_ej: Option<f64>,
    pub ren_power_ej: Option<f64>,
    pub solar_ej: Option<f64>,
    pub renewables_ej: Option<f64>,
}

impl PanelRow {
    /// Value of `metric` for this row. NaN counts as missing.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        let v = match metric {
            Metric::Population => self.population,
            Metric::Hydro => self.hydro_ej,
            Metric::Nuclear => self.nuclear_ej,
            Metric::RenPower => self.ren_power_ej,
            Metric::Solar => self.solar_ej,
            Metric::Renewables => self.renewables_ej,
        };
        v.filter(|x| !x.is_nan())
    }
}

/// Numeric columns of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Population,
    Hydro,
    Nuclear,
    RenPower,
    Solar,
    Renewables,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Population,
        Metric::Hydro,
        Metric::Nuclear,
        Metric::RenPower,
        Metric::Solar,
        Metric::Renewables,
    ];

    /// Column name in the panel CSV.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Population => "pop",
            Metric::Hydro => "hydro_ej",
            Metric::Nuclear => "nuclear_ej",
            Metric::RenPower => "ren_power_ej",
            Metric::Solar => "solar_ej",
            Metric::Renewables => "renewables_ej",
        }
    }

    pub fn from_column(name: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.column() == name)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// The four energy types a user can pick in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyType {
    Hydro,
    Nuclear,
    Renewable,
    Solar,
}

impl EnergyType {
    pub const ALL: [EnergyType; 4] = [
        EnergyType::Hydro,
        EnergyType::Nuclear,
        EnergyType::Renewable,
        EnergyType::Solar,
    ];

    /// Underlying column. "Renewable" is renewable *power*, not the broader
    /// `renewables_ej` total.
    pub fn metric(&self) -> Metric {
        match self {
            EnergyType::Hydro => Metric::Hydro,
            EnergyType::Nuclear => Metric::Nuclear,
            EnergyType::Renewable => Metric::RenPower,
            EnergyType::Solar => Metric::Solar,
        }
    }

    /// Series name used in the combined chart legend.
    pub fn label(&self) -> &'static str {
        match self {
            EnergyType::Hydro => "Hydro Energy",
            EnergyType::Nuclear => "Nuclear Energy",
            EnergyType::Renewable => "Renewable Energy",
            EnergyType::Solar => "Solar Energy",
        }
    }

    /// Label used in leaderboard titles.
    pub fn production_label(&self) -> &'static str {
        match self {
            EnergyType::Hydro => "Hydro Energy Production",
            EnergyType::Nuclear => "Nuclear Energy Production",
            EnergyType::Renewable => "Renewable Energy Production",
            EnergyType::Solar => "Solar Energy Production",
        }
    }
}

/// Canonical country name, as spelled by the geospatial reference's ADMIN field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryKey(String);

impl CountryKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CountryKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for CountryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of resolving a map click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "country", rename_all = "snake_case")]
pub enum Selection {
    /// Nothing usable was clicked.
    None,
    Country(CountryKey),
}

impl Selection {
    pub fn country(&self) -> Option<&CountryKey> {
        match self {
            Selection::None => None,
            Selection::Country(k) => Some(k),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_metric_reads_as_missing() {
        let row = PanelRow {
            country: "X".into(),
            year: 2000,
            region: "R".into(),
            population: Some(f64::NAN),
            hydro_ej: Some(1.5),
            nuclear_ej: None,
            ren_power_ej: None,
            solar_ej: None,
            renewables_ej: None,
        };
        assert_eq!(row.get(Metric::Population), None);
        assert_eq!(row.get(Metric::Hydro), Some(1.5));
        assert_eq!(row.get(Metric::Nuclear), None);
    }

    #[test]
    fn metric_columns_round_trip() {
        for m in Metric::ALL {
            assert_eq!(Metric::from_column(m.column()), Some(m));
        }
        assert_eq!(Metric::from_column("coal_ej"), None);
    }

    #[test]
    fn renewable_energy_type_maps_to_ren_power() {
        assert_eq!(EnergyType::Renewable.metric(), Metric::RenPower);
    }
}
