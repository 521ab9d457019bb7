use dioxus::prelude::*;
use skyglobe_shared::models::{Layer, Point};
use skyglobe_shared::nav::HoverDetails;

/// Offset from the pointer so the card does not sit under the cursor.
const TOOLTIP_OFFSET: f64 = 15.0;

#[component]
pub fn WeatherTooltip(details: Option<HoverDetails>, pointer: Point) -> Element {
    let Some(details) = details else {
        return rsx! {};
    };

    let style = format!(
        "left: {}px; top: {}px;",
        pointer.x + TOOLTIP_OFFSET,
        pointer.y + TOOLTIP_OFFSET
    );
    let accent = details.color.clone().unwrap_or_else(|| "#FFFFFF".to_string());

    rsx! {
        div { class: "weather-tooltip", style: "{style}",
            div { class: "tooltip-header",
                span { class: "tooltip-swatch", style: "background: {accent};" }
                strong { "{details.name}" }
                span { class: "tooltip-kind", "{details.kind}" }
            }

            if details.kind == Layer::City {
                if let Some(w) = &details.weather {
                    div { class: "tooltip-weather",
                        span { class: "tooltip-temp", "{w.temp_c}°C" }
                        span { class: "tooltip-desc", "{w.description}" }
                        span { class: "tooltip-humidity", "{w.humidity}% humidity" }
                    }
                } else {
                    div { class: "tooltip-loading", "Loading weather..." }
                }
            }

            if details.explorable {
                div { class: "tooltip-hint", "Click to explore" }
            }
        }
    }
}
