use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use skyglobe_shared::models::{cache_key, WeatherSnapshot};
use thiserror::Error;
use tokio::sync::RwLock;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1/current.json";
pub const DEFAULT_TTL_SECS: i64 = 600;

/// weatherapi.com error code for "No matching location found".
const LOCATION_NOT_FOUND: u32 = 1006;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather lookups are disabled (no API key configured)")]
    Disabled,
    #[error("invalid weather endpoint `{0}`")]
    InvalidUrl(String),
    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no matching location for `{0}`")]
    NotFound(String),
    #[error("weather provider returned {status}: {message}")]
    Upstream { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub ttl: Duration,
}

impl WeatherConfig {
    pub fn from_env() -> Self {
        let ttl_secs = std::env::var("WEATHER_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECS);
        WeatherConfig {
            api_key: std::env::var("WEATHER_API_KEY").unwrap_or_default(),
            base_url: std::env::var("WEATHER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// Upstream response shapes

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
pub struct ApiCurrent {
    pub temp_c: f64,
    pub humidity: f64,
    pub wind_kph: f64,
    pub condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
pub struct ApiCondition {
    pub text: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    code: u32,
    message: String,
}

pub fn snapshot_from_response(resp: ApiResponse) -> WeatherSnapshot {
    let current = resp.current;
    let icon = if current.condition.icon.starts_with("//") {
        format!("https:{}", current.condition.icon)
    } else {
        current.condition.icon
    };
    WeatherSnapshot {
        temp_c: current.temp_c.round() as i32,
        humidity: current.humidity.round().max(0.0) as u32,
        wind_speed_ms: (current.wind_kph / 3.6).round() as i32,
        description: current.condition.text.to_lowercase(),
        condition: current.condition.text,
        icon,
    }
}

#[derive(Debug, Clone)]
struct CachedEntry {
    snapshot: WeatherSnapshot,
    fetched_at: DateTime<Utc>,
}

pub struct WeatherService {
    client: reqwest::Client,
    config: WeatherConfig,
    cache: RwLock<HashMap<String, CachedEntry>>,
}

impl WeatherService {
    pub fn new(config: WeatherConfig) -> Self {
        if !config.is_enabled() {
            tracing::warn!("WEATHER_API_KEY not set; weather lookups will return nothing");
        }
        WeatherService {
            client: reqwest::Client::new(),
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Cached-or-fetched snapshot for `city`.
    ///
    /// When the provider does not recognise the name and coordinates are
    /// given, a single retry is made with a `lat,lon` query.
    pub async fn fetch(
        &self,
        city: &str,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<WeatherSnapshot, WeatherError> {
        if let Some(snapshot) = self.peek(city).await {
            tracing::debug!(city, "Using cached weather");
            return Ok(snapshot);
        }
        if !self.config.is_enabled() {
            return Err(WeatherError::Disabled);
        }

        tracing::info!(city, "Fetching weather");
        let snapshot = match (self.request(city).await, lat, lon) {
            (Ok(snapshot), _, _) => snapshot,
            (Err(WeatherError::NotFound(_)), Some(lat), Some(lon)) => {
                tracing::info!(city, lat, lon, "Name not recognised, retrying by coordinates");
                self.request(&format!("{lat},{lon}")).await?
            }
            (Err(e), _, _) => return Err(e),
        };

        self.insert(city, snapshot.clone()).await;
        Ok(snapshot)
    }

    async fn request(&self, query: &str) -> Result<WeatherSnapshot, WeatherError> {
        let url = reqwest::Url::parse_with_params(
            &self.config.base_url,
            &[("key", self.config.api_key.as_str()), ("q", query), ("aqi", "no")],
        )
        .map_err(|_| WeatherError::InvalidUrl(self.config.base_url.clone()))?;

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(err) if err.error.code == LOCATION_NOT_FOUND => {
                    WeatherError::NotFound(query.to_string())
                }
                Ok(err) => WeatherError::Upstream {
                    status: status.as_u16(),
                    message: err.error.message,
                },
                Err(_) => WeatherError::Upstream {
                    status: status.as_u16(),
                    message: body,
                },
            });
        }

        let data: ApiResponse = resp.json().await?;
        Ok(snapshot_from_response(data))
    }

    /// Fresh cached snapshot, without touching the network.
    pub async fn peek(&self, city: &str) -> Option<WeatherSnapshot> {
        let cache = self.cache.read().await;
        let entry = cache.get(&cache_key(city))?;
        if Utc::now() - entry.fetched_at > self.config.ttl {
            return None;
        }
        Some(entry.snapshot.clone())
    }

    pub async fn insert(&self, city: &str, snapshot: WeatherSnapshot) {
        self.insert_at(city, snapshot, Utc::now()).await;
    }

    async fn insert_at(&self, city: &str, snapshot: WeatherSnapshot, fetched_at: DateTime<Utc>) {
        self.cache.write().await.insert(
            cache_key(city),
            CachedEntry {
                snapshot,
                fetched_at,
            },
        );
    }

    /// Evict everything, returning the number of entries dropped.
    pub async fn clear(&self) -> usize {
        let mut cache = self.cache.write().await;
        let n = cache.len();
        cache.clear();
        tracing::info!(evicted = n, "Weather cache cleared");
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> WeatherConfig {
        WeatherConfig {
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            ttl: Duration::seconds(DEFAULT_TTL_SECS),
        }
    }

    fn snapshot(temp_c: i32) -> WeatherSnapshot {
        WeatherSnapshot {
            temp_c,
            humidity: 40,
            wind_speed_ms: 5,
            condition: "Overcast".into(),
            icon: String::new(),
            description: "overcast".into(),
        }
    }

    #[test]
    fn test_snapshot_from_response_maps_units() {
        let json = r#"{
            "location": { "name": "London" },
            "current": {
                "temp_c": 12.6,
                "humidity": 81,
                "wind_kph": 20.2,
                "condition": { "text": "Light rain", "icon": "//cdn.weatherapi.com/weather/64x64/day/296.png", "code": 1183 }
            }
        }"#;
        let resp: ApiResponse = serde_json::from_str(json).unwrap();
        let snap = snapshot_from_response(resp);
        assert_eq!(snap.temp_c, 13);
        assert_eq!(snap.humidity, 81);
        // 20.2 km/h = 5.61 m/s
        assert_eq!(snap.wind_speed_ms, 6);
        assert_eq!(snap.condition, "Light rain");
        assert_eq!(snap.description, "light rain");
        assert_eq!(
            snap.icon,
            "https://cdn.weatherapi.com/weather/64x64/day/296.png"
        );
    }

    #[test]
    fn test_snapshot_keeps_absolute_icon() {
        let json = r#"{ "current": { "temp_c": -3.4, "humidity": 90, "wind_kph": 0.0,
            "condition": { "text": "Snow", "icon": "https://example.com/snow.png" } } }"#;
        let snap = snapshot_from_response(serde_json::from_str(json).unwrap());
        assert_eq!(snap.temp_c, -3);
        assert_eq!(snap.wind_speed_ms, 0);
        assert_eq!(snap.icon, "https://example.com/snow.png");
    }

    #[test]
    fn test_config_enabled_requires_key() {
        assert!(!config("").is_enabled());
        assert!(!config("   ").is_enabled());
        assert!(config("abc").is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_service_fails_without_network() {
        let service = WeatherService::new(config(""));
        let err = service.fetch("Paris", Some(48.85), Some(2.35)).await.unwrap_err();
        assert!(matches!(err, WeatherError::Disabled));
    }

    #[tokio::test]
    async fn test_cached_hit_short_circuits() {
        let service = WeatherService::new(config(""));
        service.insert("Paris", snapshot(17)).await;
        let snap = service.fetch("PARIS", None, None).await.unwrap();
        assert_eq!(snap.temp_c, 17);
    }

    #[tokio::test]
    async fn test_expired_entries_are_not_served() {
        let service = WeatherService::new(config(""));
        let old = Utc::now() - Duration::seconds(DEFAULT_TTL_SECS + 5);
        service.insert_at("Berlin", snapshot(9), old).await;
        assert!(service.peek("Berlin").await.is_none());
        assert!(matches!(
            service.fetch("Berlin", None, None).await,
            Err(WeatherError::Disabled)
        ));
    }

    #[tokio::test]
    async fn test_clear_returns_evicted_count() {
        let service = WeatherService::new(config(""));
        service.insert("Lima", snapshot(20)).await;
        service.insert("Cusco", snapshot(11)).await;
        service.insert("lima", snapshot(21)).await;
        assert_eq!(service.clear().await, 2);
        assert!(service.peek("Lima").await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_reported() {
        let mut cfg = config("key");
        cfg.base_url = "not a url".into();
        let service = WeatherService::new(cfg);
        let err = service.fetch("Oslo", None, None).await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidUrl(_)));
    }
}
