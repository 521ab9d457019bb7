use std::collections::HashMap;

use crate::catalog::City;
use crate::models::{cache_key, WeatherSnapshot};

/// Source of weather snapshots for the explorer.
///
/// The navigator only ever warms the cache and reads from it; a city with no
/// snapshot yet and a city whose fetch failed look the same from here.
pub trait WeatherProvider {
    /// Start fetching `city` in the background unless it is already cached.
    /// Never blocks and never reports failure to the caller.
    fn prefetch(&mut self, city: &City);

    /// Cached snapshot for `city_name`, if any.
    fn peek(&self, city_name: &str) -> Option<WeatherSnapshot>;
}

/// Snapshots keyed by lowercase city name.
///
/// Inserting the same city twice keeps the latest value, so concurrent fetches
/// for one city are harmless.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherCache {
    entries: HashMap<String, WeatherSnapshot>,
}

impl WeatherCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, city_name: &str) -> Option<&WeatherSnapshot> {
        self.entries.get(&cache_key(city_name))
    }

    pub fn contains(&self, city_name: &str) -> bool {
        self.entries.contains_key(&cache_key(city_name))
    }

    pub fn insert(&mut self, city_name: &str, snapshot: WeatherSnapshot) {
        self.entries.insert(cache_key(city_name), snapshot);
    }

    /// Drop every entry, returning how many were held.
    pub fn clear(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(temp_c: i32) -> WeatherSnapshot {
        WeatherSnapshot {
            temp_c,
            humidity: 50,
            wind_speed_ms: 3,
            condition: "Sunny".into(),
            icon: String::new(),
            description: "sunny".into(),
        }
    }

    #[test]
    fn test_cache_is_case_insensitive() {
        let mut cache = WeatherCache::new();
        cache.insert("Paris", snapshot(18));
        assert!(cache.contains("PARIS"));
        assert_eq!(cache.get("paris").map(|s| s.temp_c), Some(18));
    }

    #[test]
    fn test_cache_insert_is_idempotent() {
        let mut cache = WeatherCache::new();
        cache.insert("Tokyo", snapshot(22));
        cache.insert("tokyo", snapshot(22));
        assert_eq!(cache.len(), 1);
        cache.insert("TOKYO", snapshot(23));
        assert_eq!(cache.get("Tokyo").map(|s| s.temp_c), Some(23));
    }

    #[test]
    fn test_cache_clear_reports_count() {
        let mut cache = WeatherCache::new();
        cache.insert("Lyon", snapshot(15));
        cache.insert("Osaka", snapshot(25));
        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
    }
}
