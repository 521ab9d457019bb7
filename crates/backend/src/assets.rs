use skyglobe_shared::catalog::WorldCatalog;
use std::path::Path;

pub const WORLD_FILE: &str = "world.json";

pub struct Assets {
    pub world: WorldCatalog,
}

impl Assets {
    pub fn load(assets_dir: &Path) -> Result<Self, String> {
        let world_path = assets_dir.join(WORLD_FILE);

        let world_data = std::fs::read_to_string(&world_path)
            .map_err(|e| format!("Failed to read {}: {}", world_path.display(), e))?;

        let world = WorldCatalog::from_json(&world_data)
            .map_err(|e| format!("Failed to load {}: {}", WORLD_FILE, e))?;

        tracing::info!(
            continents = world.continents.len(),
            countries = world.country_count(),
            cities = world.city_count(),
            "Loaded world catalog"
        );

        Ok(Assets { world })
    }

    /// Find a city by display name, case-insensitively.
    pub fn find_city_by_name(&self, name: &str) -> Option<&skyglobe_shared::catalog::City> {
        self.world
            .continents
            .iter()
            .flat_map(|c| &c.countries)
            .flat_map(|c| &c.cities)
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: &str = r##"{ "continents": [ {
        "key": "oceania", "name": "Oceania", "color": "#4AD4E2",
        "placement": { "angle": 0.83, "radius": 0.65 },
        "countries": [ { "key": "australia", "name": "Australia", "color": "#E2D44A",
            "cities": [ { "key": "sydney", "name": "Sydney", "lat": -33.87, "lon": 151.21 } ] } ]
    } ] }"##;

    #[test]
    fn test_load_reads_world_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(WORLD_FILE), WORLD).unwrap();

        let assets = Assets::load(dir.path()).unwrap();
        assert_eq!(assets.world.continents.len(), 1);
        assert_eq!(assets.world.city_count(), 1);
        assert!(assets.find_city_by_name("SYDNEY").is_some());
        assert!(assets.find_city_by_name("Perth").is_none());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Assets::load(dir.path()).err().unwrap();
        assert!(err.contains("Failed to read"));
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(WORLD_FILE), "[1, 2").unwrap();
        let err = Assets::load(dir.path()).err().unwrap();
        assert!(err.contains("world.json"));
    }

    #[test]
    fn test_bundled_world_loads() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets");
        let assets = Assets::load(&dir).unwrap();
        assert_eq!(assets.world.continents.len(), 6);
        assert!(assets.world.continents.iter().all(|c| c.is_drawable()));
    }
}
