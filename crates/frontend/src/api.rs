use serde::{Deserialize, Serialize};
use skyglobe_shared::catalog::WorldCatalog;
use skyglobe_shared::models::WeatherSnapshot;

const WORLD_QUERY: &str = r#"query {
    world {
        continents {
            key name color placement { angle radius }
            countries { key name color cities { key name lat lon } }
        }
    }
}"#;

const WEATHER_QUERY: &str = r#"query Weather($city: String!, $lat: Float, $lon: Float) {
    weather(city: $city, lat: $lat, lon: $lon) {
        tempC humidity windSpeedMs condition icon description
    }
}"#;

/// Build the variables JSON for a weather query.
pub fn build_weather_variables(city: &str, lat: f64, lon: f64) -> serde_json::Value {
    // Non-finite coordinates would serialize as null anyway; say so explicitly
    let coord = |v: f64| {
        if v.is_finite() {
            serde_json::json!(v)
        } else {
            serde_json::Value::Null
        }
    };
    serde_json::json!({ "city": city, "lat": coord(lat), "lon": coord(lon) })
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

fn api_url() -> Result<String, String> {
    let origin = web_sys::window()
        .ok_or("no window")?
        .location()
        .origin()
        .map_err(|_| "no origin".to_string())?;
    Ok(format!("{}/graphql", origin))
}

async fn query<T: for<'de> Deserialize<'de>>(
    query_str: &str,
    variables: Option<serde_json::Value>,
) -> Result<T, String> {
    let req = GraphQLRequest {
        query: query_str.to_string(),
        variables,
    };

    let resp = reqwest::Client::new()
        .post(api_url()?)
        .json(&req)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let gql_resp: GraphQLResponse<T> = resp.json().await.map_err(|e| e.to_string())?;
    unwrap_response(gql_resp)
}

fn unwrap_response<T>(resp: GraphQLResponse<T>) -> Result<T, String> {
    if let Some(errors) = resp.errors {
        if let Some(first) = errors.into_iter().next() {
            return Err(first.message);
        }
    }
    resp.data.ok_or_else(|| "No data returned".to_string())
}

#[derive(Deserialize)]
pub struct WorldResponse {
    pub world: WorldCatalog,
}

impl WorldResponse {
    /// The server catalog goes through the same key checks as one read from disk.
    fn into_catalog(self) -> Result<WorldCatalog, String> {
        self.world.validate().map_err(|e| e.to_string())?;
        Ok(self.world)
    }
}

pub async fn fetch_world() -> Result<WorldCatalog, String> {
    let resp: WorldResponse = query(WORLD_QUERY, None).await?;
    resp.into_catalog()
}

#[derive(Deserialize)]
pub struct WeatherResponse {
    pub weather: Option<WeatherSnapshot>,
}

/// `Ok(None)` means the server could not produce weather for this city.
pub async fn fetch_weather(
    city: &str,
    lat: f64,
    lon: f64,
) -> Result<Option<WeatherSnapshot>, String> {
    let resp: WeatherResponse =
        query(WEATHER_QUERY, Some(build_weather_variables(city, lat, lon))).await?;
    Ok(resp.weather)
}
