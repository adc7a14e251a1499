pub mod balance;
pub mod electro;

use crate::config::run::RunParams;
use crate::config::setup::parameters::simulation::SimParams;
use crate::config::setup::schedule::{Demonstration, Drive};
use crate::geometry::pendulum;
use crate::state::{Frame, FrameSummary, SimState};
use log::{debug, info};

/// Advance the state by one frame under the given drive.
///
/// The separation either follows the scene geometry (fixed charge moved, bob
/// at its previous deflection) or stays pinned while the charge product
/// varies. The electric force, its capped visual magnitude and the deflection
/// angle are then recomputed from scratch; nothing else feeds them.
pub fn update(params: &SimParams, state: &mut SimState, drive: &Drive) -> FrameSummary {
    let (separation, factor) = match *drive {
        Drive::Separation { fixed_charge_x } => {
            let bob = state.bob_position(params);
            let fixed = params.fixed_charge_at(fixed_charge_x);
            (pendulum::separation(bob, fixed), state.charge_product_factor)
        }
        Drive::ChargeProduct { factor } => (state.separation_distance, factor),
    };

    let raw_force = electro::coulomb_force(
        params.coulomb_scaled_base(),
        factor,
        separation,
        params.separation_floor,
    );
    let capped = raw_force > params.force_cap();
    let visual_force = raw_force.min(params.force_cap());
    let theta = balance::deflection_angle(visual_force, params.force_scale);

    debug!(
        "d={:.4} q1q2={:.3} F_e={:.4} theta={:.4} capped={}",
        separation, factor, visual_force, theta, capped
    );

    state.separation_distance = separation.max(params.separation_floor);
    state.charge_product_factor = factor;
    state.visual_force_magnitude = visual_force;
    state.deflection_angle = theta;
    state.t += params.dt;
    state.step += 1;

    FrameSummary { raw_force, capped }
}

/// Run the full schedule headlessly, one fixed-dt frame at a time, and
/// collect every frame. Each demonstration starts from the equilibrium
/// baseline, per the state lifecycle.
pub fn run(
    params: &SimParams,
    demonstrations: &[Demonstration],
    run_params: &RunParams,
) -> Vec<Frame> {
    let mut frames = Vec::new();

    for (i, demo) in demonstrations.iter().enumerate() {
        let mut state = SimState::at_equilibrium(params);
        let n_steps = params.to_steps(demo.duration());
        info!(
            "Demonstration {} ({}): {} steps over {}s",
            i,
            demo.kind.label(),
            n_steps,
            demo.duration()
        );

        for _ in 0..n_steps {
            let drive = demo.drive_at(state.t);
            let summary = update(params, &mut state, &drive);

            let fixed_charge_position = match drive {
                Drive::Separation { fixed_charge_x } => params.fixed_charge_at(fixed_charge_x),
                Drive::ChargeProduct { .. } => params.fixed_charge_position,
            };

            if state.step % run_params.dstep_log == 0 {
                info!(
                    "CHECKPOINT: demo={} step={} t={:.2} d={:.3} q1q2={:.2} F_e={:.3} theta={:.3}",
                    i,
                    state.step,
                    state.t,
                    state.separation_distance,
                    state.charge_product_factor,
                    state.visual_force_magnitude,
                    state.deflection_angle,
                );
            }

            frames.push(Frame {
                demonstration: i,
                kind: demo.kind,
                state: state.clone(),
                summary,
                fixed_charge_position,
            });
        }
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::setup::parameters::simulation::SimParams;
    use crate::config::setup::schedule::{classic_schedule, Drive};
    use approx::assert_relative_eq;

    fn params() -> SimParams {
        SimParams::classic()
    }

    #[test]
    fn test_equilibrium_is_a_fixed_point() {
        let params = params();
        let mut state = SimState::at_equilibrium(&params);
        // Driving the fixed charge to its rest position must leave the
        // equilibrium angle and separation unchanged.
        let drive = Drive::Separation {
            fixed_charge_x: params.fixed_charge_position.x,
        };
        for _ in 0..10 {
            update(&params, &mut state, &drive);
        }
        assert_relative_eq!(
            state.deflection_angle,
            params.theta_equilibrium,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            state.separation_distance,
            params.equilibrium_separation(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_zero_charge_product_rests_vertical() {
        let params = params();
        let mut state = SimState::at_equilibrium(&params);
        update(&params, &mut state, &Drive::ChargeProduct { factor: 0.0 });
        assert_relative_eq!(state.visual_force_magnitude, 0.0);
        assert_relative_eq!(state.deflection_angle, 0.0);
    }

    #[test]
    fn test_closer_charge_deflects_further() {
        let params = params();
        let mut state = SimState::at_equilibrium(&params);
        let baseline = state.deflection_angle;
        update(
            &params,
            &mut state,
            &Drive::Separation {
                fixed_charge_x: params.fixed_charge_position.x + 1.0,
            },
        );
        assert!(state.deflection_angle > baseline);
    }

    #[test]
    fn test_overwhelming_charge_product_hits_the_cap() {
        let params = params();
        let mut state = SimState::at_equilibrium(&params);
        let summary = update(&params, &mut state, &Drive::ChargeProduct { factor: 1e6 });
        assert!(summary.capped);
        assert_relative_eq!(state.visual_force_magnitude, params.force_cap());
        assert_relative_eq!(state.deflection_angle, params.theta_cap, epsilon = 1e-12);
    }

    #[test]
    fn test_derived_fields_track_the_invariant() {
        let params = params();
        let mut state = SimState::at_equilibrium(&params);
        for factor in [0.2, 1.0, 2.5, 0.7] {
            update(&params, &mut state, &Drive::ChargeProduct { factor });
            let expected = electro::coulomb_force(
                params.coulomb_scaled_base(),
                state.charge_product_factor,
                state.separation_distance,
                params.separation_floor,
            )
            .min(params.force_cap());
            assert_relative_eq!(state.visual_force_magnitude, expected, epsilon = 1e-12);
            assert_relative_eq!(
                state.deflection_angle,
                balance::deflection_angle(expected, params.force_scale),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_run_resets_state_between_demonstrations() {
        let params = params();
        let demos: Vec<_> = classic_schedule(&params)
            .iter()
            .map(|c| c.build(&params))
            .collect();
        let frames = run(&params, &demos, &RunParams { dstep_log: 1_000_000 });

        let first_of_second = frames
            .iter()
            .find(|f| f.demonstration == 1)
            .expect("second demonstration produced no frames");
        // One step past a fresh equilibrium state.
        assert_eq!(first_of_second.state.step, 1);
        assert_relative_eq!(
            first_of_second.state.separation_distance,
            params.equilibrium_separation(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_run_is_deterministic() {
        let params = params();
        let demos: Vec<_> = classic_schedule(&params)
            .iter()
            .map(|c| c.build(&params))
            .collect();
        let run_params = RunParams { dstep_log: 1_000_000 };
        let a = run(&params, &demos, &run_params);
        let b = run(&params, &demos, &run_params);
        assert_eq!(a.len(), b.len());
        for (fa, fb) in a.iter().zip(b.iter()) {
            assert_eq!(fa.state.step, fb.state.step);
            assert_relative_eq!(fa.state.deflection_angle, fb.state.deflection_angle);
            assert_relative_eq!(
                fa.state.visual_force_magnitude,
                fb.state.visual_force_magnitude
            );
        }
    }
}
