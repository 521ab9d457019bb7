use dioxus::prelude::*;
use skyglobe_shared::catalog::City;
use skyglobe_shared::models::WeatherSnapshot;

/// Hidden while a zoom is running so the card fades in once the city has settled.
fn card_class(visible: bool) -> &'static str {
    if visible {
        "panel weather-card"
    } else {
        "panel weather-card hidden"
    }
}

/// Detail panel for the city being viewed.
#[component]
pub fn WeatherCard(
    city: Option<City>,
    weather: Option<WeatherSnapshot>,
    visible: bool,
) -> Element {
    let Some(city) = city else {
        return rsx! {};
    };

    let position = format!("{:.2}°, {:.2}°", city.lat, city.lon);

    rsx! {
        div { class: card_class(visible),
            h3 { "{city.name}" }
            p { class: "coords", "{position}" }

            if let Some(w) = weather {
                div { class: "weather-main",
                    if !w.icon.is_empty() {
                        img { src: "{w.icon}", alt: "{w.condition}", width: "64", height: "64" }
                    }
                    span { class: "weather-temp", "{w.temp_c}°C" }
                }
                p { class: "weather-desc", "{w.description}" }
                div { class: "weather-stats",
                    div { class: "stat",
                        span { class: "stat-label", "Humidity" }
                        span { class: "stat-value", "{w.humidity}%" }
                    }
                    div { class: "stat",
                        span { class: "stat-label", "Wind" }
                        span { class: "stat-value", "{w.wind_speed_ms} m/s" }
                    }
                }
            } else {
                p { style: "color: var(--text-dim); font-size: 13px;",
                    "Loading weather data..."
                }
            }
        }
    }
}
