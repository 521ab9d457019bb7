use dioxus::prelude::*;

pub const FAULT_TITLE: &str = "Something went wrong";
pub const FAULT_MESSAGE: &str =
    "The explorer hit an unexpected error. Reloading usually gets things going again.";
pub const RELOAD_LABEL: &str = "Reload Application";

fn reload_page() -> Option<()> {
    web_sys::window()?.location().reload().ok()
}

/// Shown in place of the explorer when a component below it fails to render.
#[component]
pub fn ErrorFallback() -> Element {
    rsx! {
        div { class: "app load-error",
            div { class: "panel fault-panel",
                h2 { "{FAULT_TITLE}" }
                p { "{FAULT_MESSAGE}" }
                button {
                    class: "reload-button",
                    onclick: move |_| {
                        if reload_page().is_none() {
                            tracing::error!("Page reload failed");
                        }
                    },
                    "{RELOAD_LABEL}"
                }
            }
        }
    }
}
