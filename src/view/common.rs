use bevy::prelude::*;
use colorgrad::Gradient;
use nalgebra::Point2;

use crate::config::setup::parameters::simulation::SimParams;
use crate::state::Frame;

pub const TIME_STEP: f64 = 1.0 / 60.0;

// Resources.

#[derive(Resource)]
pub struct Environment {
    pub length_factor: f64,
}

impl Environment {
    pub fn transform_coord(&self, sd: f64) -> f32 {
        (sd * self.length_factor) as f32
    }

    pub fn transformed_vec3(&self, sd: Point2<f64>, z: f32) -> Vec3 {
        Vec3::new(self.transform_coord(sd.x), self.transform_coord(sd.y), z)
    }
}

#[derive(Resource)]
pub struct Frames(pub Vec<Frame>);

#[derive(Resource)]
pub struct SimParamsRes(pub SimParams);

#[derive(Resource)]
pub struct PlaybackState {
    pub i: usize,
    pub playing: bool,
    pub stepsize: usize,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            i: 0,
            playing: true,
            stepsize: 1,
        }
    }
}

// / Resources.

pub fn increment_step(cur_i: usize, backward: bool, maxi: usize, stepsize: usize) -> usize {
    if backward {
        if cur_i > stepsize {
            cur_i - stepsize
        } else {
            0
        }
    } else {
        (cur_i + stepsize).min(maxi)
    }
}

/// Electric-force arrow color: magnitude mapped onto a viridis ramp,
/// normalized on the force cap.
pub fn force_color(magnitude: f64, cap: f64) -> Color {
    let g = colorgrad::preset::viridis();
    let s = if cap > 0.0 {
        (magnitude / cap).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let c = g.at(s as f32);
    Color::srgba(c.r, c.g, c.b, c.a)
}

pub fn close_on_esc(
    mut commands: Commands,
    focused_windows: Query<(Entity, &Window)>,
    input: Res<ButtonInput<KeyCode>>,
) {
    for (window, focus) in focused_windows.iter() {
        if !focus.focused {
            continue;
        }

        if input.just_pressed(KeyCode::Escape) {
            commands.entity(window).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::increment_step;

    #[test]
    fn test_increment_step_clamps_at_both_ends() {
        assert_eq!(increment_step(0, true, 10, 3), 0);
        assert_eq!(increment_step(2, true, 10, 3), 0);
        assert_eq!(increment_step(5, true, 10, 3), 2);
        assert_eq!(increment_step(9, false, 10, 3), 10);
        assert_eq!(increment_step(10, false, 10, 3), 10);
    }
}
