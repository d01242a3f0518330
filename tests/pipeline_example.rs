//! End-to-end walk through normalization, selection, filtering and series.

use clean_energy::series::{SeriesPoint, to_series};
use clean_energy::{ClickEvent, Metric, NameMap, PanelRow, Selection, filter, normalize, resolve};

fn us(year: i32, solar: f64) -> PanelRow {
    PanelRow {
        country: "US".into(),
        year,
        region: "Americas".into(),
        population: None,
        hydro_ej: None,
        nuclear_ej: None,
        ren_power_ej: None,
        solar_ej: Some(solar),
        renewables_ej: None,
    }
}

#[test]
fn us_click_to_latest_solar_point() {
    let mut table = vec![us(2000, 0.1), us(2001, 0.3)];
    NameMap::builtin().apply(&mut table);
    assert!(table.iter().all(|r| r.country == "United States of America"));

    let sel = resolve(Some(&ClickEvent::clicked("United States of America")));
    let key = sel.country().expect("country selected");

    let rows = filter::by_country(&table, key);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].year, 2000);
    assert_eq!(rows[1].year, 2001);

    let s = to_series(&rows, Metric::Solar, "Solar Energy");
    assert_eq!(s.latest, Some(SeriesPoint { x: 2001, y: Some(0.3) }));
}

#[test]
fn normalizing_twice_changes_nothing() {
    for name in ["US", "Serbia", "Czech Republic", "Germany", "Hong Kong"] {
        let once = normalize(name);
        assert_eq!(normalize(&once), once, "{name}");
    }
}

#[test]
fn unmatched_selection_gives_empty_table() {
    let table = vec![us(2000, 0.1)];
    let sel = resolve(Some(&ClickEvent::clicked("Atlantis")));
    assert_eq!(sel, Selection::Country("Atlantis".into()));
    assert!(filter::by_country(&table, sel.country().unwrap()).is_empty());
}

#[test]
fn series_keep_row_order_and_gaps() {
    let mut rows = vec![us(2003, 0.4), us(2001, 0.2), us(2002, 0.3)];
    rows[2].solar_ej = None;
    let s = to_series(&rows, Metric::Solar, "Solar");
    assert_eq!(s.xs(), vec![2003, 2001, 2002]);
    assert_eq!(s.points[2].y, None);
    assert_eq!(s.latest, Some(SeriesPoint { x: 2003, y: Some(0.4) }));
}
