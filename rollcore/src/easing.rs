//! Scalar interpolation helpers shared by the views and the spinner.

/// Linear interpolation between two values
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic ease-in: slow start, fast finish. Domain and range are [0, 1].
pub fn ease_in_cubic(x: f32) -> f32 {
    x * x * x
}

/// Add two phases and keep only the fractional part, so the result
/// always lands in [0, 1).
pub fn modulo_add(a: f32, b: f32) -> f32 {
    let ab = a + b;
    ab - ab.floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
        assert_eq!(lerp(800.0, 400.0, 0.25), 700.0);
    }

    #[test]
    fn test_ease_in_cubic_values() {
        assert_eq!(ease_in_cubic(0.0), 0.0);
        assert_eq!(ease_in_cubic(1.0), 1.0);
        assert_eq!(ease_in_cubic(0.5), 0.125);
    }

    #[test]
    fn test_ease_in_cubic_monotone() {
        let mut last = ease_in_cubic(0.0);
        for i in 1..=100 {
            let v = ease_in_cubic(i as f32 / 100.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_modulo_add_wraps() {
        assert!((modulo_add(0.75, 0.5) - 0.25).abs() < 1e-6);
        assert_eq!(modulo_add(0.25, 0.25), 0.5);
        assert_eq!(modulo_add(0.5, 0.5), 0.0);
        assert!((modulo_add(0.1, -0.2) - 0.9).abs() < 1e-6);
    }
}
