use dioxus::prelude::*;
use skyglobe_shared::models::Layer;
use skyglobe_shared::nav::Navigator;

use crate::coords;
use crate::weather::WebWeather;

fn hint_for(layer: Layer) -> &'static str {
    match layer {
        Layer::Planet => "Click a continent to zoom in",
        Layer::Continent => "Click a country to explore",
        Layer::Country => "Click a city for its weather",
        Layer::City => "Right-click or Esc to go back",
    }
}

#[component]
pub fn NavBar(nav: Signal<Navigator<WebWeather>>, show_help: Signal<bool>) -> Element {
    let mut nav = nav;
    let mut show_help = show_help;

    let (layer, can_go_back, crumbs) = {
        let n = nav.read();
        let crumbs: Vec<String> = std::iter::once("Earth")
            .chain(n.breadcrumb())
            .map(str::to_string)
            .collect();
        (n.layer(), n.history().len() > 1, crumbs)
    };
    let last = crumbs.len().saturating_sub(1);
    let hint = hint_for(layer);

    rsx! {
        div { class: "nav-bar",
            div { class: "nav-buttons",
                button {
                    class: "nav-home",
                    disabled: layer == Layer::Planet,
                    onclick: move |_| {
                        nav.write().go_home(coords::now_ms());
                    },
                    "Home"
                }
                if can_go_back {
                    button {
                        class: "nav-back",
                        onclick: move |_| {
                            nav.write().go_back(coords::now_ms());
                        },
                        "Back"
                    }
                }
            }

            div { class: "breadcrumb",
                for (i, crumb) in crumbs.iter().enumerate() {
                    span { class: if i == last { "crumb current" } else { "crumb" }, "{crumb}" }
                    if i != last {
                        span { class: "crumb-sep", "/" }
                    }
                }
            }

            div { class: "layer-indicator",
                for l in Layer::ALL {
                    span {
                        class: if l == layer { "layer-dot active" } else { "layer-dot" },
                        title: "{l}",
                    }
                }
                span { class: "layer-label", "{layer}" }
            }

            span { class: "nav-hint", "{hint}" }

            button {
                class: "help-button",
                "aria-label": "Show help",
                onclick: move |_| show_help.set(true),
                "?"
            }
        }
    }
}
