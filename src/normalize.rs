//! Country name normalization between the statistics panel and the
//! geospatial reference.
//!
//! The panel spells some countries differently from the map's `ADMIN` field
//! ("US" vs "United States of America"). A [`NameMap`] rewrites the panel
//! spelling once at load so later lookups are exact string comparisons.

use crate::models::PanelRow;
use ahash::AHashMap;
use log::debug;
use std::sync::OnceLock;

/// Panel spelling -> map spelling.
const CORRECTIONS: [(&str, &str); 9] = [
    ("US", "United States of America"),
    ("Turkiye", "Turkey"),
    ("Czech Republic", "Czechia"),
    ("Russian Federation", "Russia"),
    ("Democratic Republic of Congo", "Democratic Republic of the Congo"),
    ("Republic of Congo", "Republic of the Congo"),
    ("Trinidad & Tobago", "Trinidad and Tobago"),
    ("China Hong Kong SAR", "Hong Kong"),
    ("Serbia", "Republic of Serbia"),
];

/// Immutable rename table. Names without an entry pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct NameMap {
    map: AHashMap<String, String>,
}

impl NameMap {
    /// Build from arbitrary pairs. A repeated key keeps its last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { map }
    }

    /// The built-in corrections table.
    pub fn builtin() -> &'static NameMap {
        static BUILTIN: OnceLock<NameMap> = OnceLock::new();
        BUILTIN.get_or_init(|| NameMap::from_pairs(CORRECTIONS))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Map one name. Total and pure.
    pub fn normalize<'a>(&'a self, name: &'a str) -> &'a str {
        self.map.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Rewrite the `country` of every row in place. Returns how many rows changed.
    pub fn apply(&self, rows: &mut [PanelRow]) -> usize {
        let mut changed = 0;
        for row in rows.iter_mut() {
            if let Some(to) = self.map.get(&row.country) {
                row.country = to.clone();
                changed += 1;
            }
        }
        debug!("normalized {} country names", changed);
        changed
    }
}

/// Normalize with the built-in table.
pub fn normalize(name: &str) -> String {
    NameMap::builtin().normalize(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_correction() {
        assert_eq!(NameMap::builtin().len(), CORRECTIONS.len());
        for (from, to) in CORRECTIONS {
            assert_eq!(normalize(from), to);
        }
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(normalize("Germany"), "Germany");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn idempotent_on_builtin() {
        for (from, _) in CORRECTIONS {
            let once = normalize(from);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn last_duplicate_key_wins() {
        let m = NameMap::from_pairs([("A", "B"), ("A", "C")]);
        assert_eq!(m.normalize("A"), "C");
    }
}
