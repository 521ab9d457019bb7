mod api;
mod components;
mod coords;
mod pages;
mod render;
mod weather;

use dioxus::prelude::*;

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Title { "Skyglobe" }
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        ErrorBoundary {
            handle_error: move |_: ErrorContext| {
                tracing::error!("Render fault caught by the error boundary");
                rsx! { components::error_fallback::ErrorFallback {} }
            },
            pages::explorer::Explorer {}
        }
    }
}

fn main() {
    launch(App);
}
