use serde::{Deserialize, Serialize};

/// Zoom level of the explorer, ordered from the outermost view inwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    Planet,
    Continent,
    Country,
    City,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Planet, Layer::Continent, Layer::Country, Layer::City];

    /// Number of descents needed to reach this layer from the planet view.
    pub fn depth(self) -> usize {
        match self {
            Layer::Planet => 0,
            Layer::Continent => 1,
            Layer::Country => 2,
            Layer::City => 3,
        }
    }

    /// The layer one click deeper, or `None` at the terminal city view.
    pub fn next(self) -> Option<Layer> {
        match self {
            Layer::Planet => Some(Layer::Continent),
            Layer::Continent => Some(Layer::Country),
            Layer::Country => Some(Layer::City),
            Layer::City => None,
        }
    }

    pub fn parent(self) -> Option<Layer> {
        match self {
            Layer::Planet => None,
            Layer::Continent => Some(Layer::Planet),
            Layer::Country => Some(Layer::Continent),
            Layer::City => Some(Layer::Country),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Layer::Planet => "Planet",
            Layer::Continent => "Continent",
            Layer::Country => "Country",
            Layer::City => "City",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Chain of keys chosen while drilling down: continent, then country, then city.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionPath {
    pub continent: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl SelectionPath {
    /// Record the key that enters `layer`, dropping anything deeper.
    pub fn set(&mut self, layer: Layer, key: impl Into<String>) {
        self.truncate_to(layer.parent().unwrap_or(Layer::Planet));
        let key = Some(key.into());
        match layer {
            Layer::Planet => {}
            Layer::Continent => self.continent = key,
            Layer::Country => self.country = key,
            Layer::City => self.city = key,
        }
    }

    /// Clear every key deeper than `layer`.
    pub fn truncate_to(&mut self, layer: Layer) {
        if layer < Layer::City {
            self.city = None;
        }
        if layer < Layer::Country {
            self.country = None;
        }
        if layer < Layer::Continent {
            self.continent = None;
        }
    }

    pub fn clear(&mut self) {
        self.truncate_to(Layer::Planet);
    }

    /// Keys are set exactly up to `layer` and never skip a level.
    pub fn is_consistent_with(&self, layer: Layer) -> bool {
        let set = [
            self.continent.is_some(),
            self.country.is_some(),
            self.city.is_some(),
        ];
        set.iter()
            .enumerate()
            .all(|(i, &is_set)| is_set == (i < layer.depth()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temp_c: i32,
    pub humidity: u32,
    pub wind_speed_ms: i32,
    pub condition: String,
    pub icon: String,
    pub description: String,
}

/// Weather caches are keyed by lowercase city name.
pub fn cache_key(city_name: &str) -> String {
    city_name.to_lowercase()
}

/// Node tint for a temperature reading in Celsius.
pub fn temp_color(temp_c: i32) -> &'static str {
    if temp_c < 10 {
        "#4DA6FF"
    } else if temp_c < 20 {
        "#66CC66"
    } else if temp_c < 30 {
        "#FF9933"
    } else {
        "#FF4C4C"
    }
}
