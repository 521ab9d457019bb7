use std::sync::Arc;

use async_graphql::{Context, Object, SimpleObject};
use skyglobe_shared::{catalog, models};

use crate::assets::Assets;
use crate::weather::WeatherService;

// GraphQL output types

#[derive(SimpleObject, Clone)]
pub struct GqlPlacement {
    pub angle: f64,
    pub radius: f64,
}

#[derive(SimpleObject, Clone)]
pub struct GqlCity {
    pub key: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(SimpleObject, Clone)]
pub struct GqlCountry {
    pub key: String,
    pub name: String,
    pub color: String,
    pub cities: Vec<GqlCity>,
}

#[derive(SimpleObject, Clone)]
pub struct GqlContinent {
    pub key: String,
    pub name: String,
    pub color: String,
    pub placement: GqlPlacement,
    pub countries: Vec<GqlCountry>,
}

#[derive(SimpleObject)]
pub struct GqlWorld {
    pub continents: Vec<GqlContinent>,
}

#[derive(SimpleObject)]
pub struct GqlWeather {
    pub temp_c: i32,
    pub humidity: u32,
    pub wind_speed_ms: i32,
    pub condition: String,
    pub icon: String,
    pub description: String,
}

impl From<&catalog::City> for GqlCity {
    fn from(c: &catalog::City) -> Self {
        GqlCity {
            key: c.key.clone(),
            name: c.name.clone(),
            lat: c.lat,
            lon: c.lon,
        }
    }
}

impl From<&catalog::Country> for GqlCountry {
    fn from(c: &catalog::Country) -> Self {
        GqlCountry {
            key: c.key.clone(),
            name: c.name.clone(),
            color: c.color.clone(),
            cities: c.cities.iter().map(GqlCity::from).collect(),
        }
    }
}

impl From<&catalog::Continent> for GqlContinent {
    fn from(c: &catalog::Continent) -> Self {
        GqlContinent {
            key: c.key.clone(),
            name: c.name.clone(),
            color: c.color.clone(),
            placement: GqlPlacement {
                angle: c.placement.angle,
                radius: c.placement.radius,
            },
            countries: c.countries.iter().map(GqlCountry::from).collect(),
        }
    }
}

impl From<models::WeatherSnapshot> for GqlWeather {
    fn from(w: models::WeatherSnapshot) -> Self {
        GqlWeather {
            temp_c: w.temp_c,
            humidity: w.humidity,
            wind_speed_ms: w.wind_speed_ms,
            condition: w.condition,
            icon: w.icon,
            description: w.description,
        }
    }
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn world(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlWorld> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(GqlWorld {
            continents: assets
                .world
                .continents
                .iter()
                .map(GqlContinent::from)
                .collect(),
        })
    }

    /// Current weather for a city. Failures are logged and come back as null.
    ///
    /// Coordinates default to the catalog entry of the same name.
    async fn weather(
        &self,
        ctx: &Context<'_>,
        city: String,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> async_graphql::Result<Option<GqlWeather>> {
        let service = ctx.data::<Arc<WeatherService>>()?;
        let assets = ctx.data::<Arc<Assets>>()?;
        let known = assets.find_city_by_name(&city);
        let lat = lat.or(known.map(|c| c.lat));
        let lon = lon.or(known.map(|c| c.lon));

        match service.fetch(&city, lat, lon).await {
            Ok(snapshot) => Ok(Some(snapshot.into())),
            Err(e) => {
                tracing::warn!(city = %city, error = %e, "Weather fetch failed");
                Ok(None)
            }
        }
    }

    async fn cached_weather(
        &self,
        ctx: &Context<'_>,
        city: String,
    ) -> async_graphql::Result<Option<GqlWeather>> {
        let service = ctx.data::<Arc<WeatherService>>()?;
        Ok(service.peek(&city).await.map(GqlWeather::from))
    }
}

// Mutation root

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Drop every cached snapshot; returns how many were evicted.
    async fn clear_weather_cache(&self, ctx: &Context<'_>) -> async_graphql::Result<u64> {
        let service = ctx.data::<Arc<WeatherService>>()?;
        Ok(service.clear().await as u64)
    }
}

pub type Schema = async_graphql::Schema<QueryRoot, MutationRoot, async_graphql::EmptySubscription>;

pub fn build_schema(assets: Arc<Assets>, weather: Arc<WeatherService>) -> Schema {
    async_graphql::Schema::build(QueryRoot, MutationRoot, async_graphql::EmptySubscription)
        .data(assets)
        .data(weather)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::{WeatherConfig, DEFAULT_BASE_URL};
    use skyglobe_shared::catalog::WorldCatalog;

    const WORLD: &str = r##"{ "continents": [ {
        "key": "europe", "name": "Europe", "color": "#9B6BE2",
        "placement": { "angle": 0.33, "radius": 0.8 },
        "countries": [ { "key": "italy", "name": "Italy", "color": "#4AE2C8",
            "cities": [
                { "key": "rome", "name": "Rome", "lat": 41.9, "lon": 12.5 },
                { "key": "milan", "name": "Milan", "lat": 45.46, "lon": 9.19 }
            ] } ]
    } ] }"##;

    fn schema() -> (Schema, Arc<WeatherService>) {
        let assets = Arc::new(Assets {
            world: WorldCatalog::from_json(WORLD).unwrap(),
        });
        let weather = Arc::new(WeatherService::new(WeatherConfig {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            ttl: chrono::Duration::seconds(600),
        }));
        (build_schema(assets, weather.clone()), weather)
    }

    fn rome() -> models::WeatherSnapshot {
        models::WeatherSnapshot {
            temp_c: 26,
            humidity: 55,
            wind_speed_ms: 3,
            condition: "Sunny".into(),
            icon: "https://cdn.weatherapi.com/113.png".into(),
            description: "sunny".into(),
        }
    }

    #[tokio::test]
    async fn test_world_query_returns_nested_tree() {
        let (schema, _) = schema();
        let resp = schema
            .execute("{ world { continents { key placement { angle } countries { name cities { key lat } } } } }")
            .await;
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);
        let data = resp.data.into_json().unwrap();
        let continent = &data["world"]["continents"][0];
        assert_eq!(continent["key"], "europe");
        assert_eq!(continent["placement"]["angle"], 0.33);
        assert_eq!(continent["countries"][0]["cities"][1]["key"], "milan");
    }

    #[tokio::test]
    async fn test_weather_query_serves_cached_snapshot() {
        let (schema, weather) = schema();
        weather.insert("Rome", rome()).await;
        let resp = schema
            .execute(r#"{ weather(city: "rome") { tempC windSpeedMs description } }"#)
            .await;
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);
        let data = resp.data.into_json().unwrap();
        assert_eq!(data["weather"]["tempC"], 26);
        assert_eq!(data["weather"]["windSpeedMs"], 3);
        assert_eq!(data["weather"]["description"], "sunny");
    }

    #[tokio::test]
    async fn test_weather_failure_is_null_not_error() {
        let (schema, _) = schema();
        let resp = schema
            .execute(r#"{ weather(city: "Milan", lat: 45.46, lon: 9.19) { tempC } }"#)
            .await;
        assert!(resp.errors.is_empty());
        let data = resp.data.into_json().unwrap();
        assert!(data["weather"].is_null());
    }

    #[tokio::test]
    async fn test_cached_weather_and_clear() {
        let (schema, weather) = schema();
        weather.insert("Rome", rome()).await;

        let resp = schema
            .execute(r#"{ cachedWeather(city: "ROME") { condition } }"#)
            .await;
        let data = resp.data.into_json().unwrap();
        assert_eq!(data["cachedWeather"]["condition"], "Sunny");

        let resp = schema.execute("mutation { clearWeatherCache }").await;
        assert!(resp.errors.is_empty());
        assert_eq!(resp.data.into_json().unwrap()["clearWeatherCache"], 1);

        let resp = schema
            .execute(r#"{ cachedWeather(city: "Rome") { condition } }"#)
            .await;
        assert!(resp.data.into_json().unwrap()["cachedWeather"].is_null());
    }
}
