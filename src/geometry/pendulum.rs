use nalgebra::{Point2, Vector2};

/// Position of the bob for a given deflection angle, measured from the
/// downward vertical. Positive angles deflect toward +x.
pub fn bob_position(pivot: Point2<f64>, length: f64, theta: f64) -> Point2<f64> {
    pivot + length * Vector2::new(theta.sin(), -theta.cos())
}

pub fn string_vector(pivot: Point2<f64>, bob: Point2<f64>) -> Vector2<f64> {
    bob - pivot
}

pub fn separation(bob: Point2<f64>, fixed_charge: Point2<f64>) -> f64 {
    nalgebra::distance(&bob, &fixed_charge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_6};

    #[test]
    fn test_bob_position_hangs_straight_down_at_zero() {
        let pivot = Point2::new(0.0, 2.5);
        let r = bob_position(pivot, 2.5, 0.0);
        assert_relative_eq!(r.x, 0.0);
        assert_relative_eq!(r.y, 0.0);
    }

    #[test]
    fn test_bob_position_horizontal_at_right_angle() {
        let pivot = Point2::new(0.0, 2.5);
        let r = bob_position(pivot, 2.5, FRAC_PI_2);
        assert_relative_eq!(r.x, 2.5);
        assert_relative_eq!(r.y, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_bob_stays_on_the_string() {
        let pivot = Point2::new(0.0, 2.5);
        let r = bob_position(pivot, 2.5, FRAC_PI_6);
        assert_relative_eq!(string_vector(pivot, r).norm(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_separation_is_symmetric() {
        let a = Point2::new(1.25, 0.33);
        let b = Point2::new(-1.8, 0.0);
        assert_relative_eq!(separation(a, b), separation(b, a));
        assert_relative_eq!(separation(a, a), 0.0);
    }
}
