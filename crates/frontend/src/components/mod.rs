pub mod error_fallback;
pub mod globe_view;
pub mod help_overlay;
pub mod nav_bar;
pub mod tooltip;
pub mod weather_card;
