use crate::config::setup::parameters::simulation::SimParams;
use crate::config::setup::schedule::DemonstrationKind;
use crate::geometry::pendulum;
use nalgebra::Point2;

/// Scalar state of the demonstration, advanced once per frame.
///
/// `visual_force_magnitude` and `deflection_angle` are derived from
/// `separation_distance` and `charge_product_factor` by the per-frame update;
/// they are never written independently while a demonstration runs.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct SimState {
    pub separation_distance: f64,
    pub charge_product_factor: f64,
    pub visual_force_magnitude: f64,
    pub deflection_angle: f64,
    pub t: f64,
    pub step: usize,
}

impl SimState {
    /// Baseline state: charges at their rest configuration, pendulum held at
    /// the equilibrium angle by the calibrated electric force.
    pub fn at_equilibrium(params: &SimParams) -> SimState {
        SimState {
            separation_distance: params.equilibrium_separation(),
            charge_product_factor: 1.0,
            visual_force_magnitude: params.equilibrium_force(),
            deflection_angle: params.theta_equilibrium,
            t: 0.0,
            step: 0,
        }
    }

    pub fn bob_position(&self, params: &SimParams) -> Point2<f64> {
        pendulum::bob_position(params.pivot, params.pendulum_length, self.deflection_angle)
    }
}

// A frame summary records what the updater saw before clamping, for logging
// and trace output.

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct FrameSummary {
    pub raw_force: f64,
    pub capped: bool,
}

/// One rendered frame of a demonstration: the state after the update, the
/// update summary, and the scene inputs the view needs to lay objects out.
#[derive(Debug, Clone)]
pub struct Frame {
    pub demonstration: usize,
    pub kind: DemonstrationKind,
    pub state: SimState,
    pub summary: FrameSummary,
    pub fixed_charge_position: Point2<f64>,
}
