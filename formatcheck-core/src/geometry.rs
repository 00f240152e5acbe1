// Unit conversion and tolerance helpers shared by the checkers.

/// Host length unit (points) per centimeter
pub const POINTS_PER_CM: f64 = 28.35;

/// Default tolerance for geometry comparisons, in centimeters
pub const DEFAULT_TOLERANCE_CM: f64 = 0.05;

/// Font size the host reports for mixed or unset runs
pub const ABSURD_FONT_SIZE: f32 = 9_999_999.0;

// Absorbs representation error so that a value exactly on the tolerance
// boundary compares as inside it.
const EPSILON: f64 = 1e-9;

pub fn points_to_cm(points: f64) -> f64 {
    points / POINTS_PER_CM
}

pub fn cm_to_points(cm: f64) -> f64 {
    cm * POINTS_PER_CM
}

pub fn within_tolerance(actual: f64, expected: f64, tolerance: f64) -> bool {
    (actual - expected).abs() <= tolerance + EPSILON
}

pub fn within_range(value: f64, min: f64, max: f64, tolerance: f64) -> bool {
    value + tolerance + EPSILON >= min && value - tolerance - EPSILON <= max
}

/// True when the host signalled "no single value" through the sentinel size
pub fn is_absurd_font_size(size: Option<f32>) -> bool {
    matches!(size, Some(size) if size >= ABSURD_FONT_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_to_cm_round_trip() {
        assert!((points_to_cm(cm_to_points(3.0)) - 3.0).abs() < 1e-12);
        assert!((points_to_cm(85.05) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_tolerance_boundary() {
        assert!(within_tolerance(3.05, 3.0, DEFAULT_TOLERANCE_CM));
        assert!(within_tolerance(points_to_cm(cm_to_points(2.95)), 3.0, DEFAULT_TOLERANCE_CM));
        assert!(!within_tolerance(3.06, 3.0, DEFAULT_TOLERANCE_CM));
    }

    #[test]
    fn test_range_with_tolerance() {
        assert!(within_range(1.25, 1.2, 1.3, 0.0));
        assert!(within_range(1.34, 1.2, 1.3, 0.05));
        assert!(!within_range(1.4, 1.2, 1.3, 0.05));
    }

    #[test]
    fn test_absurd_font_size_detection() {
        assert!(is_absurd_font_size(Some(ABSURD_FONT_SIZE)));
        assert!(!is_absurd_font_size(Some(14.0)));
        assert!(!is_absurd_font_size(None));
    }
}
