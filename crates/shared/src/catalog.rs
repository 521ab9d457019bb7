//! The read-only world tree: planet → continents → countries → cities.
//!
//! Children are stored as ordered lists so iteration order (and therefore the
//! hit-test tie-break) is exactly the order of the source JSON.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::parse_hex;
use crate::models::{Layer, SelectionPath};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse world catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {kind} key `{key}` under `{parent}`")]
    DuplicateKey {
        kind: &'static str,
        key: String,
        parent: String,
    },
}

/// Polar placement of a continent on the globe.
///
/// `angle` is a fraction of a full turn, `radius` a fraction of the orbit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementHint {
    pub angle: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub key: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl City {
    pub fn is_drawable(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub key: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub cities: Vec<City>,
}

impl Country {
    pub fn is_drawable(&self) -> bool {
        parse_hex(&self.color).is_some()
    }

    pub fn city(&self, key: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Continent {
    pub key: String,
    pub name: String,
    pub color: String,
    pub placement: PlacementHint,
    #[serde(default)]
    pub countries: Vec<Country>,
}

impl Continent {
    pub fn is_drawable(&self) -> bool {
        parse_hex(&self.color).is_some()
            && self.placement.angle.is_finite()
            && self.placement.radius.is_finite()
    }

    pub fn country(&self, key: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.key == key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldCatalog {
    pub continents: Vec<Continent>,
}

/// A catalog entry resolved for display (tooltips, titles).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Continent(&'a Continent),
    Country(&'a Country),
    City(&'a City),
}

impl<'a> NodeRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            NodeRef::Continent(c) => &c.name,
            NodeRef::Country(c) => &c.name,
            NodeRef::City(c) => &c.name,
        }
    }
}

impl WorldCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: WorldCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Keys must be unique among siblings, since selection and hit-testing go by key.
    pub fn validate(&self) -> Result<(), CatalogError> {
        unique(self.continents.iter().map(|c| c.key.as_str()), "continent", "planet")?;
        for continent in &self.continents {
            unique(
                continent.countries.iter().map(|c| c.key.as_str()),
                "country",
                &continent.key,
            )?;
            for country in &continent.countries {
                unique(country.cities.iter().map(|c| c.key.as_str()), "city", &country.key)?;
            }
        }
        Ok(())
    }

    pub fn continent(&self, key: &str) -> Option<&Continent> {
        self.continents.iter().find(|c| c.key == key)
    }

    pub fn country(&self, continent: &str, key: &str) -> Option<&Country> {
        self.continent(continent)?.country(key)
    }

    pub fn city(&self, continent: &str, country: &str, key: &str) -> Option<&City> {
        self.country(continent, country)?.city(key)
    }

    /// Continent entered by `selection`, if it resolves.
    pub fn selected_continent(&self, selection: &SelectionPath) -> Option<&Continent> {
        self.continent(selection.continent.as_deref()?)
    }

    pub fn selected_country(&self, selection: &SelectionPath) -> Option<&Country> {
        self.selected_continent(selection)?
            .country(selection.country.as_deref()?)
    }

    pub fn selected_city(&self, selection: &SelectionPath) -> Option<&City> {
        self.selected_country(selection)?
            .city(selection.city.as_deref()?)
    }

    /// Resolve `key` among the children shown while viewing `layer`.
    ///
    /// Keys are layer-scoped: a continent key looked up at the country layer
    /// does not resolve, even if the same string names a continent.
    pub fn resolve(
        &self,
        layer: Layer,
        selection: &SelectionPath,
        key: &str,
    ) -> Option<NodeRef<'_>> {
        match layer {
            Layer::Planet => self.continent(key).map(NodeRef::Continent),
            Layer::Continent => self
                .selected_continent(selection)?
                .country(key)
                .map(NodeRef::Country),
            Layer::Country => self
                .selected_country(selection)?
                .city(key)
                .map(NodeRef::City),
            Layer::City => None,
        }
    }

    pub fn country_count(&self) -> usize {
        self.continents.iter().map(|c| c.countries.len()).sum()
    }

    pub fn city_count(&self) -> usize {
        self.continents
            .iter()
            .flat_map(|c| &c.countries)
            .map(|c| c.cities.len())
            .sum()
    }
}

fn unique<'a>(
    keys: impl Iterator<Item = &'a str>,
    kind: &'static str,
    parent: &str,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(CatalogError::DuplicateKey {
                kind,
                key: key.to_string(),
                parent: parent.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    fn city(key: &str, name: &str, lat: f64, lon: f64) -> City {
        City {
            key: key.into(),
            name: name.into(),
            lat,
            lon,
        }
    }

    /// Small two-continent world used across the crate's tests.
    pub fn sample_world() -> WorldCatalog {
        WorldCatalog {
            continents: vec![
                Continent {
                    key: "europe".into(),
                    name: "Europe".into(),
                    color: "#4A90E2".into(),
                    placement: PlacementHint {
                        angle: 0.1,
                        radius: 0.8,
                    },
                    countries: vec![
                        Country {
                            key: "france".into(),
                            name: "France".into(),
                            color: "#5B8DEF".into(),
                            cities: vec![
                                city("paris", "Paris", 48.8566, 2.3522),
                                city("lyon", "Lyon", 45.764, 4.8357),
                                city("marseille", "Marseille", 43.2965, 5.3698),
                            ],
                        },
                        Country {
                            key: "germany".into(),
                            name: "Germany".into(),
                            color: "#E2A84A".into(),
                            cities: vec![city("berlin", "Berlin", 52.52, 13.405)],
                        },
                    ],
                },
                Continent {
                    key: "asia".into(),
                    name: "Asia".into(),
                    color: "#E24A6B".into(),
                    placement: PlacementHint {
                        angle: 0.45,
                        radius: 0.6,
                    },
                    countries: vec![Country {
                        key: "japan".into(),
                        name: "Japan".into(),
                        color: "#C94AE2".into(),
                        cities: vec![
                            city("tokyo", "Tokyo", 35.6762, 139.6503),
                            city("osaka", "Osaka", 34.6937, 135.5023),
                        ],
                    }],
                },
            ],
        }
    }
}
