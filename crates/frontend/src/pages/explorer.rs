use std::collections::HashSet;
use std::sync::Arc;

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use skyglobe_shared::catalog::WorldCatalog;
use skyglobe_shared::layout::{GlobeSpin, Scene, Viewport};
use skyglobe_shared::models::Layer;
use skyglobe_shared::nav::Navigator;
use skyglobe_shared::weather::{WeatherCache, WeatherProvider};

use crate::api;
use crate::components::globe_view::{GlobeView, GLOBE_CONTAINER_ID};
use crate::components::help_overlay::HelpOverlay;
use crate::components::nav_bar::NavBar;
use crate::components::tooltip::WeatherTooltip;
use crate::components::weather_card::WeatherCard;
use crate::coords;
use crate::render::{ParticleField, PARTICLE_COUNT};
use crate::weather::WebWeather;

/// Roughly one frame at 60 Hz.
const FRAME_MS: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shortcut {
    Back,
    Home,
    ToggleHelp,
}

fn shortcut_for(key: &Key) -> Option<Shortcut> {
    match key {
        Key::Escape | Key::Backspace => Some(Shortcut::Back),
        Key::Home => Some(Shortcut::Home),
        Key::Character(c) if c.eq_ignore_ascii_case("h") => Some(Shortcut::Home),
        Key::Character(c) if c == "?" => Some(Shortcut::ToggleHelp),
        _ => None,
    }
}

/// One frame: advance any running transition, then lay out the scene the
/// renderer and the pointer handlers will share.
fn step_frame(
    mut nav: Signal<Navigator<WebWeather>>,
    mut scene: Signal<Scene>,
    mut particles: Signal<ParticleField>,
    spin: &mut GlobeSpin,
) {
    let Some(viewport) = coords::container_viewport(GLOBE_CONTAINER_ID) else {
        return;
    };

    if !nav.peek().is_idle() {
        let tick = nav.write().tick(coords::now_ms());
        if tick.finished {
            tracing::debug!(layer = %nav.peek().layer(), "Transition finished");
        }
    }

    let next = {
        let nav = nav.peek();
        let rotation = if nav.layer() == Layer::Planet {
            spin.advance()
        } else {
            spin.offset()
        };
        Scene::compute(nav.catalog(), nav.layer(), nav.selection(), viewport, rotation)
    };
    scene.set(next);
    particles.write().drift();
}

#[component]
pub fn Explorer() -> Element {
    let world = use_resource(|| api::fetch_world());

    let state = world.read().clone();
    match state {
        None => rsx! {
            div { class: "app loading",
                div { class: "spinner" }
                p { "Loading world..." }
            }
        },
        Some(Err(e)) => rsx! {
            div { class: "app load-error",
                h2 { "Could not load the world" }
                p { "{e}" }
            }
        },
        Some(Ok(catalog)) => rsx! {
            World { catalog }
        },
    }
}

#[component]
fn World(catalog: WorldCatalog) -> Element {
    let cache = use_signal(WeatherCache::new);
    let pending = use_signal(HashSet::<String>::new);
    let mut nav = use_signal(move || {
        Navigator::new(Arc::new(catalog), WebWeather::new(cache, pending))
    });
    let scene = use_signal(|| Scene::empty(Viewport::new(0.0, 0.0)));
    let particles =
        use_signal(|| ParticleField::new(PARTICLE_COUNT, &mut SmallRng::from_entropy()));
    let mut show_help = use_signal(|| false);

    use_future(move || async move {
        let mut spin = GlobeSpin::default();
        loop {
            TimeoutFuture::new(FRAME_MS).await;
            step_frame(nav, scene, particles, &mut spin);
        }
    });

    let (hover_details, pointer, city, city_weather, settled) = {
        let n = nav.read();
        let city = n.current_city().cloned();
        let weather = city.as_ref().and_then(|c| n.weather().peek(&c.name));
        (n.hover_details(), n.hover().pointer, city, weather, n.is_idle())
    };

    rsx! {
        div {
            class: "app",
            tabindex: "0",
            onmounted: move |evt: Event<MountedData>| async move {
                let _ = evt.set_focus(true).await;
            },
            onkeydown: move |evt: Event<KeyboardData>| {
                let Some(shortcut) = shortcut_for(&evt.key()) else {
                    return;
                };
                evt.prevent_default();
                let now = coords::now_ms();
                match shortcut {
                    Shortcut::Back if *show_help.peek() => show_help.set(false),
                    Shortcut::Back => {
                        nav.write().go_back(now);
                    }
                    Shortcut::Home => {
                        nav.write().go_home(now);
                    }
                    Shortcut::ToggleHelp => {
                        let open = *show_help.peek();
                        show_help.set(!open);
                    }
                }
            },

            NavBar { nav, show_help }

            div { class: "stage",
                GlobeView { nav, scene, cache, particles }
                WeatherTooltip { details: hover_details, pointer }
            }

            WeatherCard { city, weather: city_weather, visible: settled }

            HelpOverlay { show: show_help }
        }
    }
}
