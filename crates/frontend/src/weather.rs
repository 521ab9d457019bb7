use std::collections::HashSet;

use dioxus::prelude::*;
use skyglobe_shared::catalog::City;
use skyglobe_shared::models::{cache_key, WeatherSnapshot};
use skyglobe_shared::weather::{WeatherCache, WeatherProvider};

use crate::api;

/// Browser-side weather provider: a signal-backed cache filled by background
/// GraphQL requests.
#[derive(Clone, Copy, PartialEq)]
pub struct WebWeather {
    cache: Signal<WeatherCache>,
    pending: Signal<HashSet<String>>,
}

impl WebWeather {
    pub fn new(cache: Signal<WeatherCache>, pending: Signal<HashSet<String>>) -> Self {
        Self { cache, pending }
    }
}

/// A city needs a request unless it is already cached or one is in flight.
///
/// `pending` holds [`cache_key`]s, so lookups ignore case like the cache does.
pub fn needs_fetch(cache: &WeatherCache, pending: &HashSet<String>, city_name: &str) -> bool {
    !cache.contains(city_name) && !pending.contains(&cache_key(city_name))
}

impl WeatherProvider for WebWeather {
    fn prefetch(&mut self, city: &City) {
        if !needs_fetch(&self.cache.peek(), &self.pending.peek(), &city.name) {
            return;
        }
        let key = cache_key(&city.name);
        self.pending.write().insert(key.clone());

        let mut cache = self.cache;
        let mut pending = self.pending;
        let (name, lat, lon) = (city.name.clone(), city.lat, city.lon);
        spawn(async move {
            match api::fetch_weather(&name, lat, lon).await {
                Ok(Some(snapshot)) => cache.write().insert(&name, snapshot),
                Ok(None) => tracing::warn!(city = %name, "No weather available"),
                Err(e) => tracing::warn!(city = %name, error = %e, "Weather request failed"),
            }
            pending.write().remove(&key);
        });
    }

    fn peek(&self, city_name: &str) -> Option<WeatherSnapshot> {
        self.cache.read().get(city_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            temp_c: 18,
            humidity: 60,
            wind_speed_ms: 4,
            condition: "Cloudy".into(),
            icon: String::new(),
            description: "cloudy".into(),
        }
    }

    #[test]
    fn test_unknown_city_needs_fetch() {
        assert!(needs_fetch(&WeatherCache::new(), &HashSet::new(), "Paris"));
    }

    #[test]
    fn test_cached_city_is_skipped() {
        let mut cache = WeatherCache::new();
        cache.insert("Paris", snapshot());
        assert!(!needs_fetch(&cache, &HashSet::new(), "Paris"));
        assert!(!needs_fetch(&cache, &HashSet::new(), "PARIS"));
    }

    #[test]
    fn test_in_flight_city_is_skipped_regardless_of_case() {
        let pending: HashSet<String> = [cache_key("paris")].into_iter().collect();
        assert!(!needs_fetch(&WeatherCache::new(), &pending, "Paris"));
        assert!(needs_fetch(&WeatherCache::new(), &pending, "Lyon"));
    }

    #[test]
    fn test_failed_city_is_requested_again() {
        // A failed request leaves nothing cached and clears its pending mark
        let mut pending: HashSet<String> = [cache_key("Lyon")].into_iter().collect();
        assert!(!needs_fetch(&WeatherCache::new(), &pending, "Lyon"));
        pending.remove(&cache_key("Lyon"));
        assert!(needs_fetch(&WeatherCache::new(), &pending, "Lyon"));
    }
}
