use crate::dynamics::balance;
use crate::geometry::pendulum;
use nalgebra::Point2;
use std::f64::consts::{FRAC_PI_6, PI};

/// Scene-unit parameters of the demonstration, tuned for presentation.
/// The Coulomb base is not stored: it is calibrated from the equilibrium
/// configuration so the visualization is self-consistent by construction.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct SimParams {
    // Time step.
    pub dt: f64,
    // Pendulum layout.
    pub pivot: Point2<f64>,
    pub pendulum_length: f64,
    pub bob_radius: f64,
    // Fixed charge.
    pub fixed_charge_radius: f64,
    pub fixed_charge_position: Point2<f64>,
    // Restoring force in visual units, and the equilibrium deflection the
    // calibration pins to it.
    pub force_scale: f64,
    pub theta_equilibrium: f64,
    // Clamps: separation floor against the inverse-square blow-up, angle cap
    // against the tangent singularity.
    pub separation_floor: f64,
    pub theta_cap: f64,
}

impl SimParams {
    /// The classic demonstration scene.
    pub fn classic() -> SimParams {
        SimParams {
            dt: 1.0 / 60.0,
            pivot: Point2::new(0.0, 2.5),
            pendulum_length: 2.5,
            bob_radius: 0.2,
            fixed_charge_radius: 0.25,
            fixed_charge_position: Point2::new(-1.8, 0.0),
            force_scale: 1.2,
            theta_equilibrium: FRAC_PI_6,
            separation_floor: 0.1,
            theta_cap: 0.48 * PI,
        }
    }

    pub fn to_steps(&self, t: f64) -> usize {
        (t / self.dt).ceil() as usize
    }

    pub fn equilibrium_bob_position(&self) -> Point2<f64> {
        pendulum::bob_position(self.pivot, self.pendulum_length, self.theta_equilibrium)
    }

    pub fn equilibrium_separation(&self) -> f64 {
        pendulum::separation(self.equilibrium_bob_position(), self.fixed_charge_position)
    }

    /// Electric force holding the pendulum at its equilibrium angle.
    pub fn equilibrium_force(&self) -> f64 {
        balance::electric_force_at(self.theta_equilibrium, self.force_scale)
    }

    /// Single scalar absorbing Coulomb's constant and the baseline charges,
    /// fit so that the baseline charge product at the rest separation yields
    /// exactly the equilibrium force.
    pub fn coulomb_scaled_base(&self) -> f64 {
        self.equilibrium_force() * self.equilibrium_separation().powi(2)
    }

    /// Largest force the view will show; keeps the derived angle bounded
    /// away from the vertical.
    pub fn force_cap(&self) -> f64 {
        balance::electric_force_at(self.theta_cap, self.force_scale)
    }

    /// Fixed-charge centre when its x-coordinate is driven; the rest height
    /// never changes.
    pub fn fixed_charge_at(&self, x: f64) -> Point2<f64> {
        Point2::new(x, self.fixed_charge_position.y)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.dt <= 0.0 {
            return Err(format!("dt must be positive, got {}", self.dt));
        }
        if self.pendulum_length <= 0.0 {
            return Err(format!(
                "pendulum_length must be positive, got {}",
                self.pendulum_length
            ));
        }
        if self.force_scale <= 0.0 {
            return Err(format!(
                "force_scale must be positive, got {}",
                self.force_scale
            ));
        }
        if self.separation_floor <= 0.0 {
            return Err(format!(
                "separation_floor must be positive, got {}",
                self.separation_floor
            ));
        }
        if !(0.0..PI / 2.0).contains(&self.theta_cap) {
            return Err(format!(
                "theta_cap must lie in [0, pi/2), got {}",
                self.theta_cap
            ));
        }
        if !(0.0..self.theta_cap).contains(&self.theta_equilibrium) {
            return Err(format!(
                "theta_equilibrium must lie in [0, theta_cap), got {}",
                self.theta_equilibrium
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_classic_calibration() {
        let params = SimParams::classic();
        assert_relative_eq!(
            params.equilibrium_separation(),
            3.068335453090896,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            params.coulomb_scaled_base(),
            6.522683338077629,
            epsilon = 1e-12
        );
        assert_relative_eq!(params.force_cap(), 19.073453812638316, epsilon = 1e-9);
    }

    #[test]
    fn test_classic_validates() {
        assert!(SimParams::classic().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_degenerate_scene() {
        let mut params = SimParams::classic();
        params.force_scale = 0.0;
        assert!(params.validate().is_err());

        let mut params = SimParams::classic();
        params.theta_cap = PI;
        assert!(params.validate().is_err());
    }
}
