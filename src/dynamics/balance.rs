use std::f64::consts::FRAC_PI_2;

/// Deflection angle from the static force balance `tan(θ) = F_e / F_g`.
/// A zero restoring force degenerates to a horizontal string for any
/// positive electric force.
pub fn deflection_angle(visual_force: f64, force_scale: f64) -> f64 {
    if force_scale == 0.0 {
        if visual_force > 0.0 {
            FRAC_PI_2
        } else {
            0.0
        }
    } else {
        (visual_force / force_scale).atan()
    }
}

/// Inversion of the balance relation: the electric force that holds the
/// pendulum at a given angle. Used to calibrate the Coulomb base from the
/// equilibrium configuration.
pub fn electric_force_at(theta: f64, force_scale: f64) -> f64 {
    force_scale * theta.tan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, PI};

    #[test]
    fn test_zero_force_hangs_vertical() {
        assert_relative_eq!(deflection_angle(0.0, 1.2), 0.0);
    }

    #[test]
    fn test_reference_configuration() {
        // base 1.0, scale 1.2, d 1.0, f 1.0: force is 1.0 and uncapped.
        assert_relative_eq!(deflection_angle(1.0, 1.2), 0.6947382761967033, epsilon = 1e-12);
    }

    #[test]
    fn test_cap_maps_back_to_cap_angle() {
        let theta_cap = 0.48 * PI;
        let force_scale = 1.2;
        let capped = electric_force_at(theta_cap, force_scale);
        assert_relative_eq!(deflection_angle(capped, force_scale), theta_cap, epsilon = 1e-12);
    }

    #[test]
    fn test_round_trip_at_equilibrium() {
        let force_scale = 1.2;
        let f = electric_force_at(FRAC_PI_6, force_scale);
        assert_relative_eq!(deflection_angle(f, force_scale), FRAC_PI_6, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_restoring_force() {
        assert_relative_eq!(deflection_angle(0.5, 0.0), FRAC_PI_2);
        assert_relative_eq!(deflection_angle(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_angle_stays_below_vertical() {
        for f in [0.0, 1.0, 10.0, 1e6] {
            assert!(deflection_angle(f, 1.2) < FRAC_PI_2);
        }
    }
}
