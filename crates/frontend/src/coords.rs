use skyglobe_shared::layout::Viewport;
use skyglobe_shared::models::Point;

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) -> Point {
    Point::new(client_x - rect_left, client_y - rect_top)
}

/// Undo a `scale(s)` applied around `center`, mapping a point on screen back to
/// the unscaled scene.
///
/// Returns `None` for a degenerate scale.
pub fn undo_zoom(point: Point, center: Point, scale: f64) -> Option<Point> {
    if !(scale.is_finite() && scale > 0.0) {
        return None;
    }
    Some(Point::new(
        center.x + (point.x - center.x) / scale,
        center.y + (point.y - center.y) / scale,
    ))
}

/// Bounding rect of the element with `id`.
pub fn element_rect(id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(id)?;
    Some(element.get_bounding_client_rect())
}

/// Current size of the container as a layout viewport.
pub fn container_viewport(id: &str) -> Option<Viewport> {
    let rect = element_rect(id)?;
    Some(Viewport::new(rect.width(), rect.height()))
}

/// Map a pointer event to scene coordinates, undoing the current zoom scale.
pub fn pointer_to_scene(
    client_x: f64,
    client_y: f64,
    container_id: &str,
    scale: f64,
) -> Option<Point> {
    let rect = element_rect(container_id)?;
    let local = client_to_container(client_x, client_y, rect.left(), rect.top());
    let center = Viewport::new(rect.width(), rect.height()).center();
    undo_zoom(local, center, scale)
}

/// Milliseconds from the page's high-resolution clock.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
