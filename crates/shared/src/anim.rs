/// Scale reached at the deep end of a zoom transition.
const ZOOM_SCALE_MAX: f64 = 1.8;

/// Opacity reached at the deep end of a zoom transition.
const ZOOM_ALPHA_MIN: f64 = 0.4;

/// Which way a zoom transition moves through the layer stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    In,
    Out,
}

pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Scale applied around the viewport center while a transition runs.
///
/// Progress of exactly 0 or 1 means no transition is on screen, so the
/// identity is returned.
pub fn zoom_scale(direction: Direction, progress: f64) -> f64 {
    if progress <= 0.0 || progress >= 1.0 {
        return 1.0;
    }
    let eased = ease_in_out_cubic(progress);
    match direction {
        Direction::In => lerp(1.0, ZOOM_SCALE_MAX, eased),
        Direction::Out => lerp(ZOOM_SCALE_MAX, 1.0, eased),
    }
}

/// Global opacity while a transition runs.
pub fn zoom_alpha(direction: Direction, progress: f64) -> f64 {
    if progress <= 0.0 || progress >= 1.0 {
        return 1.0;
    }
    let eased = ease_in_out_cubic(progress);
    match direction {
        Direction::In => lerp(1.0, ZOOM_ALPHA_MIN, eased),
        Direction::Out => lerp(ZOOM_ALPHA_MIN, 1.0, eased),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert!((lerp(2.0, 6.0, 0.0) - 2.0).abs() < 1e-9);
        assert!((lerp(2.0, 6.0, 1.0) - 6.0).abs() < 1e-9);
        assert!((lerp(2.0, 6.0, 0.25) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ease_in_out_cubic_symmetry() {
        assert!((ease_in_out_cubic(0.0) - 0.0).abs() < 1e-9);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-9);
        assert!((ease_in_out_cubic(1.0) - 1.0).abs() < 1e-9);
        let a = ease_in_out_cubic(0.2);
        let b = ease_in_out_cubic(0.8);
        assert!((a + b - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_scale_identity_outside_transition() {
        assert_eq!(zoom_scale(Direction::In, 0.0), 1.0);
        assert_eq!(zoom_scale(Direction::Out, 1.0), 1.0);
    }

    #[test]
    fn test_zoom_scale_midpoint() {
        // Eased midpoint is exactly halfway between the two scales
        assert!((zoom_scale(Direction::In, 0.5) - 1.4).abs() < 1e-9);
        assert!((zoom_scale(Direction::Out, 0.5) - 1.4).abs() < 1e-9);
        assert!(zoom_scale(Direction::In, 0.9) > zoom_scale(Direction::In, 0.1));
        assert!(zoom_scale(Direction::Out, 0.9) < zoom_scale(Direction::Out, 0.1));
    }

    #[test]
    fn test_zoom_alpha_fades_in_direction() {
        assert!(zoom_alpha(Direction::In, 0.9) < 0.5);
        assert!(zoom_alpha(Direction::Out, 0.1) < 0.5);
        assert_eq!(zoom_alpha(Direction::In, 0.0), 1.0);
    }
}
