//! Layer navigation: drill-down, back, home, and the zoom transition that
//! carries each change.
//!
//! A navigation command never changes the model directly. It starts a
//! transition with one pending commit, and [`Navigator::tick`] applies that
//! commit once [`COMMIT_DELAY_MS`] have elapsed, so the model flips at the
//! midpoint of the zoom.

use std::sync::Arc;

use crate::anim::Direction;
use crate::catalog::{City, NodeRef, WorldCatalog};
use crate::color::with_alpha_suffix;
use crate::models::{Layer, Point, SelectionPath, WeatherSnapshot};
use crate::weather::WeatherProvider;

pub const TRANSITION_DURATION_MS: f64 = 800.0;
pub const COMMIT_DELAY_MS: f64 = 400.0;

pub const PLANET_BACKGROUND: &str = "#0A1628";
pub const CITY_BACKGROUND: &str = "#12192B";

const CONTINENT_TINT: &str = "30";
const COUNTRY_TINT: &str = "20";

/// Zoom animation state. `progress` is 0 whenever `active` is false.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransitionState {
    pub active: bool,
    pub direction: Direction,
    pub progress: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoverState {
    pub key: Option<String>,
    pub pointer: Point,
}

#[derive(Debug, Clone, PartialEq)]
enum PendingCommit {
    Descend { layer: Layer, key: String },
    Ascend,
    Home,
}

#[derive(Debug, Clone)]
struct InFlight {
    started_at: f64,
    commit: Option<PendingCommit>,
}

/// What a single [`Navigator::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTick {
    pub progress: f64,
    /// The pending navigation was applied on this call.
    pub committed: bool,
    /// The transition completed on this call.
    pub finished: bool,
}

/// Everything the renderer needs from navigation for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct NavFrame {
    pub layer: Layer,
    pub selection: SelectionPath,
    pub hover: HoverState,
    pub transition: TransitionState,
    pub background: String,
}

/// Tooltip content for the hovered node.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverDetails {
    pub name: String,
    /// Layer the node belongs to (the one clicking it would enter).
    pub kind: Layer,
    pub color: Option<String>,
    /// Only filled in for cities.
    pub weather: Option<WeatherSnapshot>,
    /// A click would be accepted right now.
    pub explorable: bool,
}

pub struct Navigator<W: WeatherProvider> {
    catalog: Arc<WorldCatalog>,
    weather: W,
    layer: Layer,
    selection: SelectionPath,
    history: Vec<Layer>,
    transition: TransitionState,
    in_flight: Option<InFlight>,
    hover: HoverState,
    background: String,
}

impl<W: WeatherProvider> Navigator<W> {
    pub fn new(catalog: Arc<WorldCatalog>, weather: W) -> Self {
        Self {
            catalog,
            weather,
            layer: Layer::Planet,
            selection: SelectionPath::default(),
            history: vec![Layer::Planet],
            transition: TransitionState::default(),
            in_flight: None,
            hover: HoverState::default(),
            background: PLANET_BACKGROUND.to_string(),
        }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn selection(&self) -> &SelectionPath {
        &self.selection
    }

    pub fn history(&self) -> &[Layer] {
        &self.history
    }

    pub fn transition(&self) -> TransitionState {
        self.transition
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none()
    }

    pub fn catalog(&self) -> &Arc<WorldCatalog> {
        &self.catalog
    }

    pub fn weather(&self) -> &W {
        &self.weather
    }

    pub fn weather_mut(&mut self) -> &mut W {
        &mut self.weather
    }

    pub fn frame(&self) -> NavFrame {
        NavFrame {
            layer: self.layer,
            selection: self.selection.clone(),
            hover: self.hover.clone(),
            transition: self.transition,
            background: self.background.clone(),
        }
    }

    /// Descend into `key`, a child shown at the current layer.
    ///
    /// Ignored while a transition runs, at the city layer, when `target` is
    /// not the next layer down, or when `key` does not resolve.
    pub fn handle_node_click(&mut self, target: Layer, key: &str, now_ms: f64) -> bool {
        if !self.is_idle() {
            tracing::debug!(key, "click ignored: transition in flight");
            return false;
        }
        let Some(expected) = self.layer.next() else {
            tracing::debug!(key, "click ignored: terminal layer");
            return false;
        };
        if target != expected {
            tracing::debug!(%target, %expected, "click ignored: layer mismatch");
            return false;
        }
        if self.catalog.resolve(self.layer, &self.selection, key).is_none() {
            tracing::debug!(key, layer = %self.layer, "click ignored: unknown node");
            return false;
        }
        self.begin(
            Direction::In,
            PendingCommit::Descend {
                layer: target,
                key: key.to_string(),
            },
            now_ms,
        );
        true
    }

    /// Record the hovered key and pointer. Allowed at any time.
    pub fn handle_node_hover(&mut self, key: Option<&str>, pointer: Point) {
        self.hover.key = key.map(str::to_string);
        self.hover.pointer = pointer;
    }

    pub fn go_back(&mut self, now_ms: f64) -> bool {
        if !self.is_idle() || self.history.len() <= 1 {
            tracing::debug!(layer = %self.layer, "back ignored");
            return false;
        }
        self.begin(Direction::Out, PendingCommit::Ascend, now_ms);
        true
    }

    pub fn go_home(&mut self, now_ms: f64) -> bool {
        if !self.is_idle() || self.layer == Layer::Planet {
            tracing::debug!(layer = %self.layer, "home ignored");
            return false;
        }
        self.begin(Direction::Out, PendingCommit::Home, now_ms);
        true
    }

    fn begin(&mut self, direction: Direction, commit: PendingCommit, now_ms: f64) {
        self.transition = TransitionState {
            active: true,
            direction,
            progress: 0.0,
        };
        self.in_flight = Some(InFlight {
            started_at: now_ms,
            commit: Some(commit),
        });
    }

    /// Advance the running transition to `now_ms`. A no-op while idle.
    pub fn tick(&mut self, now_ms: f64) -> FrameTick {
        let Some(started_at) = self.in_flight.as_ref().map(|f| f.started_at) else {
            return FrameTick::default();
        };
        let elapsed = now_ms - started_at;
        let mut progress = (elapsed / TRANSITION_DURATION_MS).clamp(0.0, 1.0);
        if progress.is_nan() {
            progress = 0.0;
        }
        // Clocks that step backwards must not rewind the zoom
        let progress = progress.max(self.transition.progress);

        let mut committed = false;
        if elapsed >= COMMIT_DELAY_MS || progress >= 1.0 {
            if let Some(commit) = self.in_flight.as_mut().and_then(|f| f.commit.take()) {
                self.apply(commit);
                committed = true;
            }
        }

        if progress >= 1.0 {
            self.transition = TransitionState::default();
            self.in_flight = None;
            return FrameTick {
                progress: 1.0,
                committed,
                finished: true,
            };
        }
        self.transition.progress = progress;
        FrameTick {
            progress,
            committed,
            finished: false,
        }
    }

    fn apply(&mut self, commit: PendingCommit) {
        match commit {
            PendingCommit::Descend { layer, key } => {
                self.selection.set(layer, key);
                self.background = background_for(&self.catalog, layer, &self.selection);
                self.prefetch_for(layer);
                self.layer = layer;
                self.history.push(layer);
            }
            PendingCommit::Ascend => {
                self.history.pop();
                if self.history.is_empty() {
                    self.history.push(Layer::Planet);
                }
                self.layer = self.history.last().copied().unwrap_or(Layer::Planet);
                self.selection.truncate_to(self.layer);
                self.background = background_for(&self.catalog, self.layer, &self.selection);
            }
            PendingCommit::Home => {
                self.layer = Layer::Planet;
                self.history = vec![Layer::Planet];
                self.selection.clear();
                self.background = PLANET_BACKGROUND.to_string();
            }
        }
        // Keys are layer-scoped
        self.hover.key = None;
        tracing::debug!(
            layer = %self.layer,
            depth = self.history.len() - 1,
            "navigation committed"
        );
    }

    fn prefetch_for(&mut self, entering: Layer) {
        let catalog = Arc::clone(&self.catalog);
        match entering {
            Layer::Country => {
                if let Some(country) = catalog.selected_country(&self.selection) {
                    for city in &country.cities {
                        self.weather.prefetch(city);
                    }
                }
            }
            Layer::City => {
                if let Some(city) = catalog.selected_city(&self.selection) {
                    self.weather.prefetch(city);
                }
            }
            Layer::Planet | Layer::Continent => {}
        }
    }

    /// The city being viewed, when at the city layer.
    pub fn current_city(&self) -> Option<&City> {
        if self.layer != Layer::City {
            return None;
        }
        self.catalog.selected_city(&self.selection)
    }

    /// Display names along the selection, outermost first.
    pub fn breadcrumb(&self) -> Vec<&str> {
        let catalog = &self.catalog;
        let selection = &self.selection;
        [
            catalog.selected_continent(selection).map(|c| c.name.as_str()),
            catalog.selected_country(selection).map(|c| c.name.as_str()),
            catalog.selected_city(selection).map(|c| c.name.as_str()),
        ]
        .into_iter()
        .map_while(|name| name)
        .collect()
    }

    /// Tooltip content for the hovered key, or `None` if nothing resolves.
    pub fn hover_details(&self) -> Option<HoverDetails> {
        let key = self.hover.key.as_deref()?;
        let kind = self.layer.next()?;
        let node = self.catalog.resolve(self.layer, &self.selection, key)?;
        let (color, weather) = match node {
            NodeRef::Continent(c) => (Some(c.color.clone()), None),
            NodeRef::Country(c) => (Some(c.color.clone()), None),
            NodeRef::City(c) => {
                let weather = self.weather.peek(&c.name);
                // Without a reading a city takes its country's color, as drawn
                let color = match &weather {
                    Some(w) => Some(crate::models::temp_color(w.temp_c).to_string()),
                    None => self
                        .catalog
                        .selected_country(&self.selection)
                        .map(|country| country.color.clone()),
                };
                (color, weather)
            }
        };
        Some(HoverDetails {
            name: node.name().to_string(),
            kind,
            color,
            weather,
            explorable: self.is_idle(),
        })
    }
}

/// Background tint for `layer` given the selection that entered it.
pub fn background_for(catalog: &WorldCatalog, layer: Layer, selection: &SelectionPath) -> String {
    let tinted = match layer {
        Layer::Planet => None,
        Layer::Continent => catalog
            .selected_continent(selection)
            .map(|c| with_alpha_suffix(&c.color, CONTINENT_TINT)),
        Layer::Country => catalog
            .selected_country(selection)
            .map(|c| with_alpha_suffix(&c.color, COUNTRY_TINT)),
        Layer::City => catalog
            .selected_city(selection)
            .map(|_| CITY_BACKGROUND.to_string()),
    };
    tinted.unwrap_or_else(|| PLANET_BACKGROUND.to_string())
}
