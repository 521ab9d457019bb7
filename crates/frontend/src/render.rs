//! SVG scene builder. Everything here is a pure function of the navigation
//! frame and the [`Scene`] it was laid out with, so painting and hit-testing
//! always agree on node positions.

use rand::Rng;
use skyglobe_shared::anim::{zoom_alpha, zoom_scale};
use skyglobe_shared::catalog::{NodeRef, WorldCatalog};
use skyglobe_shared::color::{hex_to_rgba, lighten};
use skyglobe_shared::layout::{Scene, Viewport};
use skyglobe_shared::models::{temp_color, Layer};
use skyglobe_shared::nav::NavFrame;
use skyglobe_shared::weather::WeatherCache;

pub const PARTICLE_COUNT: usize = 150;

const CITY_DETAIL_RADIUS: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position as a fraction of the viewport.
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
    pub opacity: f64,
}

/// Ambient drifting particles. Visual only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new<R: Rng>(count: usize, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                x: rng.gen::<f64>(),
                y: rng.gen::<f64>(),
                size: rng.gen::<f64>() * 2.0 + 0.5,
                speed: rng.gen::<f64>() * 0.0003 + 0.0001,
                opacity: rng.gen::<f64>() * 0.5 + 0.3,
            })
            .collect();
        Self { particles }
    }

    /// Move every particle down one frame, wrapping at the bottom edge.
    pub fn drift(&mut self) {
        for p in &mut self.particles {
            p.y += p.speed;
            if p.y > 1.0 {
                p.y = 0.0;
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

/// Visual style for one interactive node.
struct NodeStyle<'a> {
    color: &'a str,
    radius: f64,
    hovered: bool,
    glow: f64,
    highlight: f64,
    label: &'a str,
    label_size: f64,
    label_gap: f64,
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Build the complete `<svg>` document for one frame.
pub fn build_svg(
    frame: &NavFrame,
    scene: &Scene,
    catalog: &WorldCatalog,
    weather: &WeatherCache,
    particles: &ParticleField,
) -> String {
    let vp = scene.viewport;
    let mut svg = String::with_capacity(16384);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="100%" height="100%" style="position:absolute;top:0;left:0;">"#,
        vp.width, vp.height
    ));

    build_background(&mut svg, &frame.background, vp);
    build_particles(&mut svg, particles, vp);

    let scale = zoom_scale(frame.transition.direction, frame.transition.progress);
    let alpha = zoom_alpha(frame.transition.direction, frame.transition.progress);
    if frame.transition.active {
        let c = vp.center();
        svg.push_str(&format!(
            r#"<g transform="translate({} {}) scale({scale}) translate({} {})" opacity="{alpha}">"#,
            c.x, c.y, -c.x, -c.y
        ));
    } else {
        svg.push_str("<g>");
    }

    // A scene computed for another layer is stale; paint nothing rather than
    // nodes that would not match the hit-test.
    if scene.layer == frame.layer {
        let hovered = frame.hover.key.as_deref();
        match frame.layer {
            Layer::Planet => {
                build_globe(&mut svg, vp);
                build_continent_nodes(&mut svg, frame, scene, catalog, hovered);
            }
            Layer::Continent => {
                if let Some(continent) = catalog.selected_continent(&frame.selection) {
                    build_title(&mut svg, &continent.name, vp, 42.0, 70.0);
                }
                build_country_nodes(&mut svg, frame, scene, catalog, hovered);
            }
            Layer::Country => {
                if let Some(country) = catalog.selected_country(&frame.selection) {
                    build_title(&mut svg, &country.name, vp, 42.0, 70.0);
                }
                build_city_nodes(&mut svg, frame, scene, catalog, weather, hovered);
            }
            Layer::City => build_city_detail(&mut svg, frame, catalog, weather, vp),
        }
    }

    svg.push_str("</g></svg>");
    svg
}

fn build_background(svg: &mut String, bg: &str, vp: Viewport) {
    let mid = hex_to_rgba(bg, 0.7);
    let r = vp.width.max(vp.height) / 1.5;
    let c = vp.center();
    svg.push_str(&format!(
        r##"<defs><radialGradient id="bg" gradientUnits="userSpaceOnUse" cx="{}" cy="{}" r="{r}"><stop offset="0" stop-color="{bg}"/><stop offset="0.6" stop-color="{mid}"/><stop offset="1" stop-color="#000000"/></radialGradient></defs>"##,
        c.x, c.y
    ));
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="url(#bg)"/>"#,
        vp.width, vp.height
    ));
}

fn build_particles(svg: &mut String, field: &ParticleField, vp: Viewport) {
    for p in field.particles() {
        let x = p.x * vp.width;
        let y = p.y * vp.height;
        if p.size > 1.5 {
            let glow = p.opacity * 0.3;
            svg.push_str(&format!(
                r#"<circle cx="{x}" cy="{y}" r="{}" fill="rgba(200, 230, 255, {glow})"/>"#,
                p.size * 2.0
            ));
        }
        svg.push_str(&format!(
            r#"<circle cx="{x}" cy="{y}" r="{}" fill="rgba(255, 255, 255, {})"/>"#,
            p.size, p.opacity
        ));
    }
}

fn build_globe(svg: &mut String, vp: Viewport) {
    let c = vp.center();
    let r = vp.globe_radius();
    svg.push_str(&format!(
        r##"<defs><radialGradient id="atmo" gradientUnits="userSpaceOnUse" cx="{cx}" cy="{cy}" r="{ar}"><stop offset="0.82" stop-color="rgba(100, 180, 255, 0)"/><stop offset="0.92" stop-color="rgba(100, 180, 255, 0.15)"/><stop offset="1" stop-color="rgba(100, 180, 255, 0)"/></radialGradient><radialGradient id="earth" cx="0.35" cy="0.35" r="0.65"><stop offset="0" stop-color="#4A7BA7"/><stop offset="0.4" stop-color="#2E5F8F"/><stop offset="0.8" stop-color="#1A3D66"/><stop offset="1" stop-color="#0D1F3D"/></radialGradient></defs>"##,
        cx = c.x,
        cy = c.y,
        ar = r * 1.15
    ));
    svg.push_str(&format!(
        r#"<circle cx="{}" cy="{}" r="{}" fill="url(#atmo)"/>"#,
        c.x,
        c.y,
        r * 1.15
    ));
    svg.push_str(&format!(
        r#"<circle cx="{}" cy="{}" r="{r}" fill="url(#earth)"/>"#,
        c.x, c.y
    ));
    // Faint latitude arcs for texture
    svg.push_str(r#"<g opacity="0.05" fill="none" stroke="white" stroke-width="1">"#);
    for i in 0..20 {
        let rr = r * (0.6 + i as f64 * 0.02);
        let a = i as f64 / 20.0 * std::f64::consts::TAU;
        let (x1, y1) = (c.x + rr * a.cos(), c.y + rr * a.sin());
        let (x2, y2) = (c.x - rr * a.cos(), c.y - rr * a.sin());
        svg.push_str(&format!(
            r#"<path d="M {x1} {y1} A {rr} {rr} 0 0 1 {x2} {y2}"/>"#
        ));
    }
    svg.push_str("</g>");
}

fn build_title(svg: &mut String, text: &str, vp: Viewport, size: f64, y: f64) {
    svg.push_str(&format!(
        r#"<text x="{}" y="{y}" fill="white" font-size="{size}" font-family="Inter, sans-serif" font-weight="700" text-anchor="middle" style="filter: drop-shadow(0 0 10px rgba(100, 200, 255, 0.5));">{}</text>"#,
        vp.width / 2.0,
        escape_xml(text)
    ));
}

fn build_node(svg: &mut String, id: usize, x: f64, y: f64, style: &NodeStyle<'_>) {
    let NodeStyle {
        color,
        radius: r,
        hovered,
        glow,
        highlight,
        label,
        label_size,
        label_gap,
    } = *style;

    if hovered {
        let glow_color = hex_to_rgba(color, 0.7);
        let outer = r + glow;
        svg.push_str(&format!(
            r#"<defs><radialGradient id="glow{id}" gradientUnits="userSpaceOnUse" cx="{x}" cy="{y}" r="{outer}"><stop offset="{}" stop-color="{glow_color}"/><stop offset="1" stop-color="rgba(255, 255, 255, 0)"/></radialGradient></defs>"#,
            r / outer
        ));
        svg.push_str(&format!(
            r#"<circle cx="{x}" cy="{y}" r="{outer}" fill="url(#glow{id})"/>"#
        ));
    }

    svg.push_str(&format!(
        r#"<circle cx="{}" cy="{}" r="{r}" fill="rgba(0, 0, 0, 0.35)"/>"#,
        x + 3.0,
        y + 3.0
    ));

    let light = lighten(color, highlight);
    svg.push_str(&format!(
        r#"<defs><radialGradient id="node{id}" cx="0.4" cy="0.4" r="0.6"><stop offset="0" stop-color="{light}"/><stop offset="1" stop-color="{color}"/></radialGradient></defs>"#
    ));
    let (stroke, sw) = if hovered {
        ("#ffffff", 3.0)
    } else {
        ("rgba(255, 255, 255, 0.6)", 2.0)
    };
    svg.push_str(&format!(
        r#"<circle cx="{x}" cy="{y}" r="{r}" fill="url(#node{id})" stroke="{stroke}" stroke-width="{sw}"/>"#
    ));
    svg.push_str(&format!(
        r#"<circle cx="{}" cy="{}" r="{}" fill="rgba(255, 255, 255, 0.3)"/>"#,
        x - r * 0.2,
        y - r * 0.2,
        r * 0.35
    ));
    svg.push_str(&format!(
        r#"<text x="{x}" y="{}" fill="white" font-size="{label_size}" font-family="Inter, sans-serif" font-weight="700" text-anchor="middle" stroke="rgba(0,0,0,0.6)" stroke-width="3" paint-order="stroke">{}</text>"#,
        y + r + label_gap,
        escape_xml(label)
    ));
}

fn build_continent_nodes(
    svg: &mut String,
    frame: &NavFrame,
    scene: &Scene,
    catalog: &WorldCatalog,
    hovered: Option<&str>,
) {
    for (i, node) in scene.nodes.iter().enumerate() {
        let Some(NodeRef::Continent(c)) = catalog.resolve(scene.layer, &frame.selection, &node.key)
        else {
            continue;
        };
        let is_hovered = hovered == Some(node.key.as_str());
        let style = NodeStyle {
            color: &c.color,
            radius: if is_hovered { 20.0 } else { 17.0 },
            hovered: is_hovered,
            glow: 15.0,
            highlight: 20.0,
            label: &c.name,
            label_size: if is_hovered { 16.0 } else { 15.0 },
            label_gap: 28.0,
        };
        build_node(svg, i, node.x, node.y, &style);
    }
}

fn build_country_nodes(
    svg: &mut String,
    frame: &NavFrame,
    scene: &Scene,
    catalog: &WorldCatalog,
    hovered: Option<&str>,
) {
    for (i, node) in scene.nodes.iter().enumerate() {
        let Some(NodeRef::Country(c)) = catalog.resolve(scene.layer, &frame.selection, &node.key)
        else {
            continue;
        };
        let is_hovered = hovered == Some(node.key.as_str());
        let style = NodeStyle {
            color: &c.color,
            radius: if is_hovered { 48.0 } else { 43.0 },
            hovered: is_hovered,
            glow: 20.0,
            highlight: 25.0,
            label: &c.name,
            label_size: if is_hovered { 18.0 } else { 17.0 },
            label_gap: 30.0,
        };
        build_node(svg, i, node.x, node.y, &style);
    }
}

fn build_city_nodes(
    svg: &mut String,
    frame: &NavFrame,
    scene: &Scene,
    catalog: &WorldCatalog,
    weather: &WeatherCache,
    hovered: Option<&str>,
) {
    let Some(country) = catalog.selected_country(&frame.selection) else {
        return;
    };
    for (i, node) in scene.nodes.iter().enumerate() {
        let Some(NodeRef::City(city)) = catalog.resolve(scene.layer, &frame.selection, &node.key)
        else {
            continue;
        };
        let snapshot = weather.get(&city.name);
        let color = snapshot
            .map(|w| temp_color(w.temp_c))
            .unwrap_or(country.color.as_str());
        let is_hovered = hovered == Some(node.key.as_str());
        let style = NodeStyle {
            color,
            radius: if is_hovered { 53.0 } else { 48.0 },
            hovered: is_hovered,
            glow: 25.0,
            highlight: 30.0,
            label: &city.name,
            label_size: if is_hovered { 18.0 } else { 17.0 },
            label_gap: 32.0,
        };
        build_node(svg, i, node.x, node.y, &style);
        if let Some(w) = snapshot {
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" fill="white" font-size="24" font-family="Inter, sans-serif" font-weight="700" text-anchor="middle" stroke="rgba(0,0,0,0.6)" stroke-width="3" paint-order="stroke">{}°</text>"#,
                node.x,
                node.y + 9.0,
                w.temp_c
            ));
        }
    }
}

fn build_city_detail(
    svg: &mut String,
    frame: &NavFrame,
    catalog: &WorldCatalog,
    weather: &WeatherCache,
    vp: Viewport,
) {
    let Some(city) = catalog.selected_city(&frame.selection) else {
        return;
    };
    build_title(svg, &city.name, vp, 48.0, 80.0);

    let c = vp.center();
    let r = CITY_DETAIL_RADIUS;
    for i in 0..3 {
        let opacity = 0.15 - i as f64 * 0.04;
        svg.push_str(&format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="rgba(255, 255, 255, {opacity})" stroke-width="2"/>"#,
            c.x,
            c.y,
            r + i as f64 * 40.0
        ));
    }

    let Some(w) = weather.get(&city.name) else {
        return;
    };
    let color = temp_color(w.temp_c);
    let style = NodeStyle {
        color,
        radius: r,
        hovered: true,
        glow: r * 0.3,
        highlight: 40.0,
        label: "",
        label_size: 0.0,
        label_gap: 0.0,
    };
    build_node(svg, 0, c.x, c.y, &style);
    svg.push_str(&format!(
        r#"<text x="{}" y="{}" fill="white" font-size="64" font-family="Inter, sans-serif" font-weight="700" text-anchor="middle" stroke="rgba(0,0,0,0.6)" stroke-width="4" paint-order="stroke">{}°C</text>"#,
        c.x,
        c.y + 15.0,
        w.temp_c
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use skyglobe_shared::anim::Direction;
    use skyglobe_shared::models::{Point, SelectionPath, WeatherSnapshot};
    use skyglobe_shared::nav::{HoverState, TransitionState, PLANET_BACKGROUND};

    const WORLD: &str = r##"{ "continents": [
        { "key": "europe", "name": "Europe", "color": "#9B6BE2",
          "placement": { "angle": 0.33, "radius": 0.8 },
          "countries": [ { "key": "france", "name": "France", "color": "#5B8DEF",
              "cities": [
                  { "key": "paris", "name": "Paris", "lat": 48.85, "lon": 2.35 },
                  { "key": "lyon", "name": "Lyon", "lat": 45.76, "lon": 4.83 }
              ] } ] },
        { "key": "oceania", "name": "Oceania & Co", "color": "#4AD4E2",
          "placement": { "angle": 0.83, "radius": 0.65 }, "countries": [] }
    ] }"##;

    fn world() -> WorldCatalog {
        WorldCatalog::from_json(WORLD).unwrap()
    }

    fn frame(layer: Layer, selection: SelectionPath) -> NavFrame {
        NavFrame {
            layer,
            selection,
            hover: HoverState::default(),
            transition: TransitionState::default(),
            background: PLANET_BACKGROUND.to_string(),
        }
    }

    fn country_selection() -> SelectionPath {
        SelectionPath {
            continent: Some("europe".into()),
            country: Some("france".into()),
            city: None,
        }
    }

    fn sunny(temp_c: i32) -> WeatherSnapshot {
        WeatherSnapshot {
            temp_c,
            humidity: 50,
            wind_speed_ms: 2,
            condition: "Sunny".into(),
            icon: String::new(),
            description: "sunny".into(),
        }
    }

    fn vp() -> Viewport {
        Viewport::new(1000.0, 800.0)
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("A & <B>"), "A &amp; &lt;B&gt;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_particle_field_drifts_and_wraps() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut field = ParticleField::new(PARTICLE_COUNT, &mut rng);
        assert_eq!(field.particles().len(), PARTICLE_COUNT);
        assert!(field
            .particles()
            .iter()
            .all(|p| p.size >= 0.5 && p.size <= 2.5 && p.opacity >= 0.3));

        let before = field.particles()[0].y;
        field.drift();
        let after = field.particles()[0].y;
        assert!(after > before || after == 0.0);

        for _ in 0..20_000 {
            field.drift();
        }
        assert!(field.particles().iter().all(|p| (0.0..=1.0).contains(&p.y)));
    }

    #[test]
    fn test_planet_svg_labels_continents_and_escapes() {
        let world = world();
        let f = frame(Layer::Planet, SelectionPath::default());
        let scene = Scene::compute(&world, f.layer, &f.selection, vp(), 0.0);
        let svg = build_svg(&f, &scene, &world, &WeatherCache::new(), &ParticleField::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(">Europe</text>"));
        assert!(svg.contains("Oceania &amp; Co"));
        assert!(svg.contains(r#"fill="url(#earth)""#));
    }

    #[test]
    fn test_hovered_continent_is_enlarged() {
        let world = world();
        let mut f = frame(Layer::Planet, SelectionPath::default());
        f.hover = HoverState {
            key: Some("europe".into()),
            pointer: Point::default(),
        };
        let scene = Scene::compute(&world, f.layer, &f.selection, vp(), 0.0);
        let svg = build_svg(&f, &scene, &world, &WeatherCache::new(), &ParticleField::default());
        assert!(svg.contains(r#"r="20" fill="url(#node0)""#));
        assert!(svg.contains(r#"r="17" fill="url(#node1)""#));
        assert!(svg.contains("glow0"));
    }

    #[test]
    fn test_city_nodes_use_temperature_color() {
        let world = world();
        let f = frame(Layer::Country, country_selection());
        let scene = Scene::compute(&world, f.layer, &f.selection, vp(), 0.0);
        let mut weather = WeatherCache::new();
        weather.insert("Paris", sunny(31));
        let svg = build_svg(&f, &scene, &world, &weather, &ParticleField::default());
        assert!(svg.contains(r##"stop-color="#FF4C4C""##));
        assert!(svg.contains("31°"));
        // Lyon has no weather yet and keeps the country color
        assert!(svg.contains(r##"stop-color="#5B8DEF""##));
        assert!(svg.contains(">France</text>"));
    }

    #[test]
    fn test_city_detail_shows_temperature() {
        let world = world();
        let mut sel = country_selection();
        sel.city = Some("lyon".into());
        let f = frame(Layer::City, sel);
        let scene = Scene::compute(&world, f.layer, &f.selection, vp(), 0.0);
        let mut weather = WeatherCache::new();
        weather.insert("Lyon", sunny(12));
        let svg = build_svg(&f, &scene, &world, &weather, &ParticleField::default());
        assert!(svg.contains(">Lyon</text>"));
        assert!(svg.contains("12°C"));
    }

    #[test]
    fn test_transition_wraps_layer_in_zoom_group() {
        let world = world();
        let mut f = frame(Layer::Planet, SelectionPath::default());
        f.transition = TransitionState {
            active: true,
            direction: Direction::In,
            progress: 0.5,
        };
        let scene = Scene::compute(&world, f.layer, &f.selection, vp(), 0.0);
        let svg = build_svg(&f, &scene, &world, &WeatherCache::new(), &ParticleField::default());
        let scale = zoom_scale(Direction::In, 0.5);
        assert!(scale > 1.0);
        assert!(svg.contains(&format!("scale({scale})")));
        assert!(svg.contains("translate(500 400)"));
    }

    #[test]
    fn test_stale_scene_paints_no_nodes() {
        let world = world();
        let f = frame(Layer::Continent, country_selection());
        let scene = Scene::compute(&world, Layer::Planet, &SelectionPath::default(), vp(), 0.0);
        let svg = build_svg(&f, &scene, &world, &WeatherCache::new(), &ParticleField::default());
        assert!(!svg.contains("node0"));
    }
}
