//! Resolve map clicks into a country selection.
//!
//! The map widget reports the last clicked feature as a loosely shaped JSON
//! object. Everything is validated here so the rest of the pipeline only ever
//! sees a [`Selection`].
//!
//! The ADMIN name is passed on exactly as the map spells it; no trimming or
//! case folding. Only an empty name counts as no selection.

use crate::models::{CountryKey, PanelRow, Selection};
use geojson::{Feature, GeoJson};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property that carries the country name on every map feature.
pub const ADMIN_FIELD: &str = "ADMIN";

/// Payload returned by the map widget after an interaction.
///
/// ```json
/// { "last_active_drawing": { "properties": { "ADMIN": "France" } } }
/// ```
/// Every level is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    #[serde(default)]
    pub last_active_drawing: Option<ActiveDrawing>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveDrawing {
    #[serde(default)]
    pub properties: Option<serde_json::Map<String, Value>>,
}

impl ClickEvent {
    /// Event for a click on the feature named `admin`.
    pub fn clicked(admin: &str) -> Self {
        let mut props = serde_json::Map::new();
        props.insert(ADMIN_FIELD.to_string(), Value::String(admin.to_string()));
        Self {
            last_active_drawing: Some(ActiveDrawing {
                properties: Some(props),
            }),
        }
    }

    /// The clicked feature's ADMIN name, if the payload has one.
    pub fn admin_name(&self) -> Option<&str> {
        self.last_active_drawing
            .as_ref()?
            .properties
            .as_ref()?
            .get(ADMIN_FIELD)?
            .as_str()
            .filter(|s| !s.is_empty())
    }
}

/// Turn a click event into a selection. Never fails.
///
/// The key is not checked against the dataset; see [`classify`].
pub fn resolve(event: Option<&ClickEvent>) -> Selection {
    match event.and_then(ClickEvent::admin_name) {
        Some(name) => Selection::Country(CountryKey::new(name)),
        None => {
            debug!("click event carries no ADMIN name");
            Selection::None
        }
    }
}

/// Parse a raw widget payload. `null` and malformed JSON both give `None`.
pub fn parse_event(raw: &str) -> Option<ClickEvent> {
    match serde_json::from_str::<Option<ClickEvent>>(raw) {
        Ok(event) => event,
        Err(e) => {
            debug!("ignoring malformed click event: {}", e);
            None
        }
    }
}

/// Parse a raw JSON payload and resolve it. Malformed input yields `Selection::None`.
pub fn resolve_json(raw: &str) -> Selection {
    resolve(parse_event(raw).as_ref())
}

/// Resolve a clicked GeoJSON feature directly.
pub fn resolve_feature(feature: &Feature) -> Selection {
    match feature
        .property(ADMIN_FIELD)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        Some(name) => Selection::Country(CountryKey::new(name)),
        None => Selection::None,
    }
}

/// ADMIN names of every feature in a geospatial reference, in file order.
/// Features without a name are skipped.
pub fn admin_names(geo: &GeoJson) -> Vec<String> {
    let features: Vec<&Feature> = match geo {
        GeoJson::FeatureCollection(fc) => fc.features.iter().collect(),
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => Vec::new(),
    };
    features
        .into_iter()
        .filter_map(|f| resolve_feature(f).country().map(|k| k.to_string()))
        .collect()
}

/// Whether a key names a country present in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    Unmatched,
}

pub fn classify(key: &CountryKey, rows: &[PanelRow]) -> MatchStatus {
    if rows.iter().any(|r| r.country == key.as_str()) {
        MatchStatus::Matched
    } else {
        info!("no panel rows for selected country {}", key);
        MatchStatus::Unmatched
    }
}
