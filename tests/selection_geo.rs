use clean_energy::selection::{MatchStatus, admin_names, classify, resolve_feature, resolve_json};
use clean_energy::{CountryKey, PanelRow, Selection};
use geojson::GeoJson;

const WORLD: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "geometry": null, "properties": { "ADMIN": "Norway", "ISO_A3": "NOR" } },
    { "type": "Feature", "geometry": null, "properties": { "NAME": "Nameless" } },
    { "type": "Feature", "geometry": null, "properties": { "ADMIN": "Republic of Serbia" } }
  ]
}"#;

fn row(country: &str) -> PanelRow {
    PanelRow {
        country: country.into(),
        year: 2020,
        region: "Europe".into(),
        population: Some(5.4),
        hydro_ej: Some(1.2),
        nuclear_ej: None,
        ren_power_ej: None,
        solar_ej: None,
        renewables_ej: None,
    }
}

#[test]
fn admin_names_skip_unnamed_features() {
    let geo: GeoJson = WORLD.parse().unwrap();
    assert_eq!(admin_names(&geo), vec!["Norway", "Republic of Serbia"]);
}

#[test]
fn feature_click_resolves_admin() {
    let geo: GeoJson = WORLD.parse().unwrap();
    let GeoJson::FeatureCollection(fc) = geo else {
        panic!("expected a feature collection");
    };
    assert_eq!(resolve_feature(&fc.features[0]), Selection::Country("Norway".into()));
    assert_eq!(resolve_feature(&fc.features[1]), Selection::None);
}

#[test]
fn widget_payload_with_extra_fields() {
    let raw = r##"{
        "last_clicked": {"lat": 60.1, "lng": 10.2},
        "last_active_drawing": {
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [10.2, 60.1]},
            "properties": {"ADMIN": "Norway", "style": {"fillColor": "#0078FF"}}
        }
    }"##;
    assert_eq!(resolve_json(raw), Selection::Country("Norway".into()));
}

#[test]
fn drawing_without_properties_is_no_selection() {
    assert_eq!(resolve_json(r#"{"last_active_drawing": {}}"#), Selection::None);
    assert_eq!(resolve_json(r#"{"last_active_drawing": null}"#), Selection::None);
    assert_eq!(resolve_json(r#"{}"#), Selection::None);
}

#[test]
fn classify_against_panel() {
    let rows = vec![row("Norway"), row("Republic of Serbia")];
    assert_eq!(classify(&CountryKey::from("Norway"), &rows), MatchStatus::Matched);
    assert_eq!(classify(&CountryKey::from("Serbia"), &rows), MatchStatus::Unmatched);
}
