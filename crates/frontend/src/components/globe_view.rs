use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use skyglobe_shared::anim::zoom_scale;
use skyglobe_shared::layout::Scene;
use skyglobe_shared::models::Point;
use skyglobe_shared::nav::Navigator;
use skyglobe_shared::weather::WeatherCache;

use crate::coords;
use crate::render::{self, ParticleField};
use crate::weather::WebWeather;

pub const GLOBE_CONTAINER_ID: &str = "globe-container";

/// Map a pointer event into scene space using the zoom the frame is drawn with.
fn pointer_point(nav: &Navigator<WebWeather>, client_x: f64, client_y: f64) -> Option<Point> {
    let t = nav.transition();
    let scale = zoom_scale(t.direction, t.progress);
    coords::pointer_to_scene(client_x, client_y, GLOBE_CONTAINER_ID, scale)
}

#[component]
pub fn GlobeView(
    nav: Signal<Navigator<WebWeather>>,
    scene: Signal<Scene>,
    cache: Signal<WeatherCache>,
    particles: Signal<ParticleField>,
) -> Element {
    let mut nav = nav;

    // Painted from the same Scene the handlers below hit-test against
    let svg_html = use_memo(move || {
        let nav = nav.read();
        let scene = scene.read();
        let weather = cache.read();
        let field = particles.read();
        render::build_svg(&nav.frame(), &scene, nav.catalog(), &weather, &field)
    });

    rsx! {
        div {
            id: GLOBE_CONTAINER_ID,
            class: "globe-container",

            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                let Some(point) = pointer_point(&nav.peek(), client.x, client.y) else {
                    return;
                };
                let Some(key) = scene.peek().hit(point).map(|n| n.key.clone()) else {
                    return;
                };
                let mut nav = nav.write();
                if let Some(target) = nav.layer().next() {
                    nav.handle_node_click(target, &key, coords::now_ms());
                }
            },

            onmousemove: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                let Some(point) = pointer_point(&nav.peek(), client.x, client.y) else {
                    return;
                };
                let key = scene.peek().hit(point).map(|n| n.key.clone());
                // Tooltip is placed in container pixels, not scene space
                let pointer = coords::element_rect(GLOBE_CONTAINER_ID)
                    .map(|r| coords::client_to_container(client.x, client.y, r.left(), r.top()))
                    .unwrap_or(point);
                nav.write().handle_node_hover(key.as_deref(), pointer);
            },

            onmouseleave: move |_| {
                nav.write().handle_node_hover(None, Point::default());
            },

            oncontextmenu: move |evt: Event<MouseData>| {
                evt.prevent_default();
                nav.write().go_back(coords::now_ms());
            },

            div {
                class: "globe-canvas",
                class: if nav.read().hover().key.is_some() { "pointer" },
                dangerous_inner_html: "{svg_html}",
            }
        }
    }
}
