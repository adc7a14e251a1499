use std::f64::consts::PI;

use log::debug;
use nalgebra::Point2;

use super::simulation::SimParams;
use crate::geometry::pendulum;

/// SI-dimensioned route into the demonstration: real charges and pendulum
/// mechanics, plus the two display scales that map them onto the scene.
/// Converted once into SimParams; the visualization itself never carries
/// units.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct PhysicalParams {
    // Time step.
    pub dt: f64,
    // Charges (C).
    pub charge_1: f64,
    pub charge_2: f64,
    // Pendulum mechanics.
    pub bob_mass: f64,
    pub gravity: f64,
    pub string_length: f64,
    // Display mapping: scene units per metre and per newton.
    pub scene_per_metre: f64,
    pub scene_per_newton: f64,
    // Scene layout (scene units).
    pub pivot: Point2<f64>,
    pub bob_radius: f64,
    pub fixed_charge_radius: f64,
    pub fixed_charge_position: Point2<f64>,
    pub separation_floor: f64,
    pub theta_cap: f64,
}

impl PhysicalParams {
    pub fn coulomb_constant(&self) -> f64 {
        // k = 1 / 4πε₀
        1.0 / (4.0 * PI * physical_constants::VACUUM_ELECTRIC_PERMITTIVITY)
    }

    fn restoring_force(&self) -> f64 {
        self.bob_mass * self.gravity
    }

    pub fn force_scale(&self) -> f64 {
        self.restoring_force() * self.scene_per_newton
    }

    /// Coulomb base in scene units: F_scene(d_scene) = base / d_scene².
    pub fn coulomb_scaled_base(&self) -> f64 {
        self.coulomb_constant()
            * self.charge_1
            * self.charge_2
            * self.scene_per_newton
            * self.scene_per_metre.powi(2)
    }

    fn pendulum_length(&self) -> f64 {
        self.string_length * self.scene_per_metre
    }

    /// Equilibrium deflection, solved by fixed-point iteration of
    /// tan(θ) = base / (F_g · r(θ)²), where r depends on θ through the bob
    /// position.
    pub fn equilibrium_angle(&self) -> f64 {
        let base = self.coulomb_scaled_base();
        let force_scale = self.force_scale();
        if base == 0.0 {
            return 0.0;
        }

        let mut theta = 0.0;
        for i in 0..64 {
            let bob = pendulum::bob_position(self.pivot, self.pendulum_length(), theta);
            let r = pendulum::separation(bob, self.fixed_charge_position)
                .max(self.separation_floor);
            let next = (base / (force_scale * r.powi(2))).atan().min(self.theta_cap);
            if (next - theta).abs() < 1e-12 {
                debug!("equilibrium angle converged after {} iterations", i);
                return next;
            }
            theta = next;
        }
        theta
    }

    pub fn as_params(&self) -> SimParams {
        SimParams {
            dt: self.dt,
            pivot: self.pivot,
            pendulum_length: self.pendulum_length(),
            bob_radius: self.bob_radius,
            fixed_charge_radius: self.fixed_charge_radius,
            fixed_charge_position: self.fixed_charge_position,
            force_scale: self.force_scale(),
            theta_equilibrium: self.equilibrium_angle(),
            separation_floor: self.separation_floor,
            theta_cap: self.theta_cap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> PhysicalParams {
        PhysicalParams {
            dt: 1.0 / 60.0,
            charge_1: 30e-9,
            charge_2: 40e-9,
            bob_mass: 2e-3,
            gravity: 9.81,
            string_length: 0.25,
            scene_per_metre: 10.0,
            scene_per_newton: 61.0,
            pivot: Point2::new(0.0, 2.5),
            bob_radius: 0.2,
            fixed_charge_radius: 0.25,
            fixed_charge_position: Point2::new(-1.8, 0.0),
            separation_floor: 0.1,
            theta_cap: 0.48 * PI,
        }
    }

    #[test]
    fn test_coulomb_constant_value() {
        // k ≈ 8.99e9 N·m²/C².
        assert_relative_eq!(params().coulomb_constant(), 8.99e9, max_relative = 1e-3);
    }

    #[test]
    fn test_equilibrium_angle_satisfies_the_balance() {
        let p = params();
        let theta = p.equilibrium_angle();
        let bob = pendulum::bob_position(p.pivot, p.string_length * p.scene_per_metre, theta);
        let r = pendulum::separation(bob, p.fixed_charge_position);
        assert_relative_eq!(
            theta.tan(),
            p.coulomb_scaled_base() / (p.force_scale() * r.powi(2)),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_zero_charge_hangs_vertical() {
        let mut p = params();
        p.charge_1 = 0.0;
        assert_relative_eq!(p.equilibrium_angle(), 0.0);
    }

    #[test]
    fn test_as_params_round_trips_the_calibration() {
        let p = params();
        let sim = p.as_params();
        // The derived SimParams calibration must reproduce the physical
        // Coulomb base.
        assert_relative_eq!(
            sim.coulomb_scaled_base(),
            p.coulomb_scaled_base(),
            max_relative = 1e-9
        );
    }
}
