use bevy::color::palettes::css;
use bevy::prelude::*;

use crate::config::setup::parameters::simulation::SimParams;
use crate::config::setup::schedule::DemonstrationKind;
use crate::view::common::{Frames, PlaybackState, SimParamsRes};
use crate::view::scene::current_frame;

const Z_GRAPH: f32 = 2.5;
const AXIS_THICKNESS: f32 = 2.0;
const CURVE_THICKNESS: f32 = 2.0;
const CURVE_SEGMENTS: usize = 60;
const DOT_RADIUS: f32 = 4.0;

#[derive(Component)]
pub struct GraphPart;

#[derive(Component)]
pub struct GraphDot;

/// Pixel-space layout of the F_e vs r graph: separations from just above
/// contact out to 4 scene units, forces up to 1.2 times the cap.
#[derive(Resource)]
pub struct GraphLayout {
    pub origin: Vec2,
    pub size: Vec2,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl GraphLayout {
    pub fn new(params: &SimParams) -> Self {
        let x_min = (params.bob_radius + params.fixed_charge_radius + 0.1).max(0.2);
        GraphLayout {
            origin: Vec2::new(220.0, 290.0),
            size: Vec2::new(260.0, 150.0),
            x_range: (x_min, 4.0),
            y_range: (0.0, params.force_cap() * 1.2),
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.x_range.0..=self.x_range.1).contains(&x)
            && (self.y_range.0..=self.y_range.1).contains(&y)
    }

    pub fn to_px(&self, x: f64, y: f64) -> Vec2 {
        let sx = (x - self.x_range.0) / (self.x_range.1 - self.x_range.0);
        let sy = (y - self.y_range.0) / (self.y_range.1 - self.y_range.0);
        self.origin + Vec2::new(sx as f32 * self.size.x, sy as f32 * self.size.y)
    }
}

pub fn add_graph(
    mut commands: Commands,
    layout: Res<GraphLayout>,
    params: Res<SimParamsRes>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let axis_material = materials.add(ColorMaterial::from(Color::from(css::LIGHT_GRAY)));

    // Axes.
    commands.spawn((
        Mesh2d(meshes.add(Rectangle::new(layout.size.x + 8.0, AXIS_THICKNESS))),
        MeshMaterial2d(axis_material.clone()),
        Transform::from_translation(
            (layout.origin + Vec2::new(layout.size.x * 0.5, 0.0)).extend(Z_GRAPH),
        ),
        GraphPart,
    ));
    commands.spawn((
        Mesh2d(meshes.add(Rectangle::new(AXIS_THICKNESS, layout.size.y + 8.0))),
        MeshMaterial2d(axis_material),
        Transform::from_translation(
            (layout.origin + Vec2::new(0.0, layout.size.y * 0.5)).extend(Z_GRAPH),
        ),
        GraphPart,
    ));
    commands.spawn((
        Text2d::new("r"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::from(css::LIGHT_GRAY)),
        Transform::from_translation(
            (layout.origin + Vec2::new(layout.size.x + 18.0, 0.0)).extend(Z_GRAPH),
        ),
        GraphPart,
    ));
    commands.spawn((
        Text2d::new("F_e"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::from(css::ORANGE)),
        Transform::from_translation(
            (layout.origin + Vec2::new(0.0, layout.size.y + 16.0)).extend(Z_GRAPH),
        ),
        GraphPart,
    ));

    // Inverse-square curve at baseline charge product, clipped to the frame.
    let base = params.0.coulomb_scaled_base();
    let x_start = (base / layout.y_range.1).sqrt().max(layout.x_range.0);
    let step = (layout.x_range.1 - x_start) / CURVE_SEGMENTS as f64;
    let points: Vec<Vec2> = (0..=CURVE_SEGMENTS)
        .map(|i| {
            let x = x_start + step * i as f64;
            layout.to_px(x, base / x.powi(2))
        })
        .collect();

    let segment_mesh = meshes.add(Rectangle::new(1.0, CURVE_THICKNESS));
    let curve_material = materials.add(ColorMaterial::from(Color::from(css::ORANGE)));
    for pair in points.windows(2) {
        let span = pair[1] - pair[0];
        commands.spawn((
            Mesh2d(segment_mesh.clone()),
            MeshMaterial2d(curve_material.clone()),
            Transform::from_translation((pair[0] + span * 0.5).extend(Z_GRAPH))
                .with_rotation(Quat::from_rotation_z(span.y.atan2(span.x)))
                .with_scale(Vec3::new(span.length(), 1.0, 1.0)),
            GraphPart,
        ));
    }

    commands.spawn((
        Mesh2d(meshes.add(Circle::new(DOT_RADIUS))),
        MeshMaterial2d(materials.add(ColorMaterial::from(Color::from(css::ORANGE)))),
        Transform::from_translation(layout.origin.extend(Z_GRAPH + 0.1)),
        GraphPart,
        GraphDot,
    ));
}

/// The graph only accompanies the separation demonstration; the dot also
/// hides whenever the tracked point leaves the plotted ranges.
pub fn update_graph(
    layout: Res<GraphLayout>,
    frames: Res<Frames>,
    playback: Res<PlaybackState>,
    mut q_parts: Query<&mut Visibility, (With<GraphPart>, Without<GraphDot>)>,
    mut q_dot: Query<(&mut Transform, &mut Visibility), With<GraphDot>>,
) {
    let frame = current_frame(&frames, &playback);
    let shown = frame.kind == DemonstrationKind::Separation;

    for mut visibility in &mut q_parts {
        *visibility = if shown {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }

    let x = frame.state.separation_distance;
    let y = frame.state.visual_force_magnitude;
    for (mut transform, mut visibility) in &mut q_dot {
        if shown && layout.contains(x, y) {
            *visibility = Visibility::Visible;
            transform.translation = layout.to_px(x, y).extend(Z_GRAPH + 0.1);
        } else {
            *visibility = Visibility::Hidden;
        }
    }
}
