use dioxus::prelude::*;

#[component]
pub fn HelpOverlay(show: Signal<bool>) -> Element {
    if !*show.read() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "help-overlay-backdrop",
            onclick: move |_| show.set(false),

            div {
                class: "help-overlay",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),

                h2 { "Help" }

                // --- Keyboard shortcuts ---

                div { class: "shortcut-section",
                    h3 { "Navigation" }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "Esc" } " / " kbd { "Backspace" } }
                        span { "Go back one level" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "H" } " / " kbd { "Home" } }
                        span { "Return to the planet" }
                    }
                }

                div { class: "shortcut-section",
                    h3 { "Help" }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "?" } }
                        span { "Toggle this help" }
                    }
                }

                div { class: "help-divider" }

                h2 { class: "help-section-title", "Exploring" }

                div { class: "help-info-section",
                    h3 { "Zooming in" }
                    p { "Left-click a continent on the spinning globe to zoom in. From there pick a country, then a city. Each step plays a short zoom animation; clicks during the animation are ignored." }
                }

                div { class: "help-info-section",
                    h3 { "Weather" }
                    p { "Opening a country starts loading weather for all of its cities in the background, so city nodes take on a temperature color as results arrive. Hover a city to see its reading, or click it for the full card." }
                }

                div { class: "help-info-section",
                    h3 { "Temperature colors" }
                    p {
                        span { style: "color: #4DA6FF;", "below 10°C" }
                        ", "
                        span { style: "color: #66CC66;", "10 to 19°C" }
                        ", "
                        span { style: "color: #FF9933;", "20 to 29°C" }
                        ", "
                        span { style: "color: #FF4C4C;", "30°C and above" }
                        "."
                    }
                }

                div { class: "help-info-section",
                    h3 { "Going back" }
                    p { "Right-click anywhere on the map, or use the Back button, to go up one level. Home jumps straight back to the planet." }
                }

                button {
                    class: "close-help",
                    onclick: move |_| show.set(false),
                    "Close"
                }
            }
        }
    }
}
