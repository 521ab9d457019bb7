//! Node geometry for every layer.
//!
//! `compute_node_layout` is the single source of node positions. The renderer
//! paints from its output and pointer hit-testing walks the same list, so the
//! two can never disagree about where a node is.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::catalog::{PlacementHint, WorldCatalog};
use crate::models::{Layer, Point, SelectionPath};

// Globe geometry (fractions of the shorter viewport side)
pub const GLOBE_RADIUS_FACTOR: f64 = 0.28;
pub const ORBIT_FACTOR: f64 = 0.75; // of the globe radius

// Grid spacing per layer
pub const CONTINENT_SPACING_FACTOR: f64 = 0.22;
pub const COUNTRY_SPACING_FACTOR: f64 = 0.25;

/// Grid rows sit slightly above the vertical center.
pub const GRID_Y_OFFSET: f64 = -30.0;

// Hit radii in pixels, larger at deeper layers
pub const PLANET_HIT_RADIUS: f64 = 25.0;
pub const CONTINENT_HIT_RADIUS: f64 = 50.0;
pub const COUNTRY_HIT_RADIUS: f64 = 55.0;

/// Globe rotation added per animation frame, in radians.
pub const ROTATION_STEP: f64 = 0.0015;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn globe_radius(&self) -> f64 {
        self.min_side() * GLOBE_RADIUS_FACTOR
    }

    fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// One interactive node: catalog key, center, and hit radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub key: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl LayoutNode {
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.center().distance_to(point) < self.radius
    }
}

/// Hit radius for nodes shown at `layer`; the city view has no nodes.
pub fn hit_radius(layer: Layer) -> Option<f64> {
    match layer {
        Layer::Planet => Some(PLANET_HIT_RADIUS),
        Layer::Continent => Some(CONTINENT_HIT_RADIUS),
        Layer::Country => Some(COUNTRY_HIT_RADIUS),
        Layer::City => None,
    }
}

/// Position of a continent on the rotating globe.
pub fn planet_position(hint: PlacementHint, rotation: f64, viewport: Viewport) -> (f64, f64) {
    let c = viewport.center();
    let angle = hint.angle * PI * 2.0 + rotation;
    let orbit = viewport.globe_radius() * ORBIT_FACTOR;
    (
        c.x + angle.cos() * orbit * hint.radius,
        c.y + angle.sin() * orbit * hint.radius,
    )
}

/// Position of child `index` of `count` in a square-ish grid centered on the
/// viewport: `ceil(sqrt(count))` columns.
pub fn grid_position(index: usize, count: usize, spacing: f64, viewport: Viewport) -> (f64, f64) {
    let cols = grid_columns(count);
    let col = index % cols;
    let row = index / cols;
    let c = viewport.center();
    let start_x = c.x - (cols as f64 * spacing) / 2.0;
    (
        start_x + col as f64 * spacing + spacing / 2.0,
        c.y + row as f64 * spacing + GRID_Y_OFFSET,
    )
}

pub fn grid_columns(count: usize) -> usize {
    ((count as f64).sqrt().ceil() as usize).max(1)
}

/// Every interactive node visible at `layer`, in catalog order.
///
/// Entries that fail their drawable check are skipped without affecting the
/// placement of their siblings. A selection that does not resolve yields an
/// empty layout.
pub fn compute_node_layout(
    catalog: &WorldCatalog,
    layer: Layer,
    selection: &SelectionPath,
    viewport: Viewport,
    rotation: f64,
) -> Vec<LayoutNode> {
    if !viewport.is_usable() {
        return Vec::new();
    }
    let Some(radius) = hit_radius(layer) else {
        return Vec::new();
    };

    match layer {
        Layer::Planet => catalog
            .continents
            .iter()
            .filter(|c| c.is_drawable())
            .map(|c| {
                let (x, y) = planet_position(c.placement, rotation, viewport);
                LayoutNode {
                    key: c.key.clone(),
                    x,
                    y,
                    radius,
                }
            })
            .collect(),
        Layer::Continent => {
            let Some(continent) = catalog.selected_continent(selection) else {
                return Vec::new();
            };
            let spacing = viewport.min_side() * CONTINENT_SPACING_FACTOR;
            let count = continent.countries.len();
            continent
                .countries
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_drawable())
                .map(|(i, c)| grid_node(&c.key, i, count, spacing, radius, viewport))
                .collect()
        }
        Layer::Country => {
            let Some(country) = catalog.selected_country(selection) else {
                return Vec::new();
            };
            let spacing = viewport.min_side() * COUNTRY_SPACING_FACTOR;
            let count = country.cities.len();
            country
                .cities
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_drawable())
                .map(|(i, c)| grid_node(&c.key, i, count, spacing, radius, viewport))
                .collect()
        }
        Layer::City => Vec::new(),
    }
}

fn grid_node(
    key: &str,
    index: usize,
    count: usize,
    spacing: f64,
    radius: f64,
    viewport: Viewport,
) -> LayoutNode {
    let (x, y) = grid_position(index, count, spacing, viewport);
    LayoutNode {
        key: key.to_string(),
        x,
        y,
        radius,
    }
}

/// First node (in iteration order) whose hit circle contains `point`.
///
/// Overlaps resolve to iteration order, not to the nearest center.
pub fn hit_test(nodes: &[LayoutNode], point: Point) -> Option<&LayoutNode> {
    nodes.iter().find(|n| n.contains(point))
}

/// Visual-only globe rotation. Not navigation state, but every layout of the
/// planet layer must be computed with the value that was last painted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlobeSpin {
    offset: f64,
}

impl GlobeSpin {
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn advance(&mut self) -> f64 {
        self.offset += ROTATION_STEP;
        self.offset
    }
}

/// The node list handed to the renderer for one frame, together with the
/// inputs that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub layer: Layer,
    pub viewport: Viewport,
    pub rotation: f64,
    pub nodes: Vec<LayoutNode>,
}

impl Scene {
    pub fn compute(
        catalog: &WorldCatalog,
        layer: Layer,
        selection: &SelectionPath,
        viewport: Viewport,
        rotation: f64,
    ) -> Self {
        Scene {
            layer,
            viewport,
            rotation,
            nodes: compute_node_layout(catalog, layer, selection, viewport, rotation),
        }
    }

    pub fn empty(viewport: Viewport) -> Self {
        Scene {
            layer: Layer::Planet,
            viewport,
            rotation: 0.0,
            nodes: Vec::new(),
        }
    }

    pub fn hit(&self, point: Point) -> Option<&LayoutNode> {
        hit_test(&self.nodes, point)
    }
}
