use bevy::color::palettes::css;
use bevy::prelude::*;
use bevy::sprite::Anchor;

use crate::config::setup::schedule::DemonstrationKind;
use crate::state::Frame;
use crate::view::common::{force_color, Environment, Frames, PlaybackState, SimParamsRes};

// Draw-order layers.
const Z_STRING: f32 = 0.0;
const Z_DASH: f32 = 0.5;
const Z_BODY: f32 = 1.0;
const Z_ARROW: f32 = 1.5;
const Z_TEXT: f32 = 2.0;

const STRING_THICKNESS: f32 = 2.0;
const DASH_THICKNESS: f32 = 2.0;
const N_DASHES: usize = 14;
const ARROW_THICKNESS: f32 = 6.0;
const ARROW_HEAD_LENGTH: f32 = 14.0;
const ARROW_HEAD_WIDTH: f32 = 12.0;
const LABEL_OFFSET: f32 = 20.0;

// Components.

#[derive(Component)]
pub struct Bob;

#[derive(Component)]
pub struct BobPlus;

#[derive(Component)]
pub struct BobLabel;

#[derive(Component)]
pub struct StringLine;

#[derive(Component)]
pub struct FixedCharge;

#[derive(Component)]
pub struct FixedPlus;

#[derive(Component)]
pub struct FixedLabel;

#[derive(Component)]
pub struct ForceArrowShaft;

#[derive(Component)]
pub struct ForceArrowHead;

#[derive(Component)]
pub struct ForceArrowLabel;

#[derive(Component)]
pub struct SeparationDash;

#[derive(Component)]
pub struct SeparationLabel;

#[derive(Component)]
pub struct ReadoutText;

// / Components.

pub fn current_frame<'a>(frames: &'a Frames, playback: &PlaybackState) -> &'a Frame {
    &frames.0[playback.i.min(frames.0.len() - 1)]
}

pub fn add_camera(mut commands: Commands, env: Res<Environment>) {
    commands.spawn((
        Camera2d,
        Transform::from_xyz(0.0, env.transform_coord(1.0), 0.0),
    ));
}

pub fn add_scene(
    mut commands: Commands,
    env: Res<Environment>,
    params: Res<SimParamsRes>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let params = &params.0;

    let pivot_px = env.transformed_vec3(params.pivot, Z_BODY);

    // Pivot and its label are the only static scene objects.
    commands.spawn((
        Mesh2d(meshes.add(Circle::new(env.transform_coord(0.08)))),
        MeshMaterial2d(materials.add(ColorMaterial::from(Color::from(css::GRAY)))),
        Transform::from_translation(pivot_px),
    ));
    commands.spawn((
        Text2d::new("pivot"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_translation(pivot_px + Vec3::new(0.0, LABEL_OFFSET, Z_TEXT - Z_BODY)),
    ));

    commands.spawn((
        Text2d::new("Electrostatic Pendulum and Coulomb's Law"),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_translation(pivot_px + Vec3::new(0.0, 90.0, Z_TEXT - Z_BODY)),
    ));

    commands.spawn((
        Mesh2d(meshes.add(Rectangle::new(1.0, STRING_THICKNESS))),
        MeshMaterial2d(materials.add(ColorMaterial::from(Color::WHITE))),
        Transform::from_translation(Vec3::Z * Z_STRING),
        StringLine,
    ));

    commands.spawn((
        Mesh2d(meshes.add(Circle::new(env.transform_coord(params.bob_radius)))),
        MeshMaterial2d(materials.add(ColorMaterial::from(Color::from(css::DARK_RED)))),
        Transform::from_translation(Vec3::Z * Z_BODY),
        Bob,
    ));
    commands.spawn((
        Text2d::new("+"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_translation(Vec3::Z * Z_TEXT),
        BobPlus,
    ));
    commands.spawn((
        Text2d::new("q1"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_translation(Vec3::Z * Z_TEXT),
        BobLabel,
    ));

    commands.spawn((
        Mesh2d(meshes.add(Circle::new(env.transform_coord(params.fixed_charge_radius)))),
        MeshMaterial2d(materials.add(ColorMaterial::from(Color::from(css::RED)))),
        Transform::from_translation(Vec3::Z * Z_BODY),
        FixedCharge,
    ));
    commands.spawn((
        Text2d::new("+"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_translation(Vec3::Z * Z_TEXT),
        FixedPlus,
    ));
    commands.spawn((
        Text2d::new("q2"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_translation(Vec3::Z * Z_TEXT),
        FixedLabel,
    ));

    // Electric-force arrow: shaft plus head, recolored by magnitude.
    commands.spawn((
        Mesh2d(meshes.add(Rectangle::new(1.0, ARROW_THICKNESS))),
        MeshMaterial2d(materials.add(ColorMaterial::from(Color::from(css::ORANGE)))),
        Transform::from_translation(Vec3::Z * Z_ARROW),
        ForceArrowShaft,
    ));
    commands.spawn((
        Mesh2d(meshes.add(Triangle2d::new(
            Vec2::new(-0.5 * ARROW_HEAD_LENGTH, 0.5 * ARROW_HEAD_WIDTH),
            Vec2::new(-0.5 * ARROW_HEAD_LENGTH, -0.5 * ARROW_HEAD_WIDTH),
            Vec2::new(0.5 * ARROW_HEAD_LENGTH, 0.0),
        ))),
        MeshMaterial2d(materials.add(ColorMaterial::from(Color::from(css::ORANGE)))),
        Transform::from_translation(Vec3::Z * Z_ARROW),
        ForceArrowHead,
    ));
    commands.spawn((
        Text2d::new("F_e"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::from(css::ORANGE)),
        Transform::from_translation(Vec3::Z * Z_TEXT),
        ForceArrowLabel,
    ));

    // Dashed separation line.
    let dash_mesh = meshes.add(Rectangle::new(1.0, DASH_THICKNESS));
    let dash_material = materials.add(ColorMaterial::from(Color::from(css::GOLD)));
    for _ in 0..N_DASHES {
        commands.spawn((
            Mesh2d(dash_mesh.clone()),
            MeshMaterial2d(dash_material.clone()),
            Transform::from_translation(Vec3::Z * Z_DASH),
            SeparationDash,
        ));
    }
    commands.spawn((
        Text2d::new("r"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::from(css::GOLD)),
        Transform::from_translation(Vec3::Z * Z_TEXT),
        SeparationLabel,
    ));

    commands.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Anchor::TopLeft,
        Transform::from_translation(Vec3::new(
            env.transform_coord(-3.6),
            env.transform_coord(2.2),
            Z_TEXT,
        )),
        ReadoutText,
    ));
}

fn bob_px(env: &Environment, params: &SimParamsRes, frame: &Frame) -> Vec3 {
    env.transformed_vec3(frame.state.bob_position(&params.0), Z_BODY)
}

fn fixed_px(env: &Environment, frame: &Frame) -> Vec3 {
    env.transformed_vec3(frame.fixed_charge_position, Z_BODY)
}

// Plus signs scale with the square root of the charge product, floored so
// they never vanish.
fn plus_scale(factor: f64) -> f32 {
    (factor.max(0.25)).sqrt() as f32
}

pub fn update_bob(
    env: Res<Environment>,
    params: Res<SimParamsRes>,
    frames: Res<Frames>,
    playback: Res<PlaybackState>,
    mut q_bob: Query<&mut Transform, With<Bob>>,
) {
    let frame = current_frame(&frames, &playback);
    let r = bob_px(&env, &params, frame);
    for mut transform in &mut q_bob {
        transform.translation = r;
    }
}

pub fn update_bob_plus(
    env: Res<Environment>,
    params: Res<SimParamsRes>,
    frames: Res<Frames>,
    playback: Res<PlaybackState>,
    mut q_plus: Query<&mut Transform, With<BobPlus>>,
) {
    let frame = current_frame(&frames, &playback);
    let r = bob_px(&env, &params, frame);
    for mut transform in &mut q_plus {
        transform.translation = r.with_z(Z_TEXT);
        transform.scale = Vec3::splat(plus_scale(frame.state.charge_product_factor));
    }
}

pub fn update_bob_label(
    env: Res<Environment>,
    params: Res<SimParamsRes>,
    frames: Res<Frames>,
    playback: Res<PlaybackState>,
    mut q_label: Query<&mut Transform, With<BobLabel>>,
) {
    let frame = current_frame(&frames, &playback);
    let below = env.transform_coord(params.0.bob_radius) + LABEL_OFFSET;
    let r = bob_px(&env, &params, frame);
    for mut transform in &mut q_label {
        transform.translation = (r - Vec3::Y * below).with_z(Z_TEXT);
    }
}

pub fn update_string(
    env: Res<Environment>,
    params: Res<SimParamsRes>,
    frames: Res<Frames>,
    playback: Res<PlaybackState>,
    mut q_string: Query<&mut Transform, With<StringLine>>,
) {
    let frame = current_frame(&frames, &playback);
    let pivot = env.transformed_vec3(params.0.pivot, Z_STRING);
    let bob = bob_px(&env, &params, frame).with_z(Z_STRING);
    let span = bob - pivot;
    let length = span.truncate().length();
    let angle = span.y.atan2(span.x);
    for mut transform in &mut q_string {
        transform.translation = pivot + span * 0.5;
        transform.rotation = Quat::from_rotation_z(angle);
        transform.scale = Vec3::new(length, 1.0, 1.0);
    }
}

pub fn update_fixed_charge(
    env: Res<Environment>,
    params: Res<SimParamsRes>,
    frames: Res<Frames>,
    playback: Res<PlaybackState>,
    mut q_charge: Query<&mut Transform, With<FixedCharge>>,
    mut q_plus: Query<&mut Transform, (With<FixedPlus>, Without<FixedCharge>)>,
    mut q_label: Query<
        &mut Transform,
        (With<FixedLabel>, Without<FixedCharge>, Without<FixedPlus>),
    >,
) {
    let frame = current_frame(&frames, &playback);
    let r = fixed_px(&env, frame);
    for mut transform in &mut q_charge {
        transform.translation = r;
    }
    for mut transform in &mut q_plus {
        transform.translation = r.with_z(Z_TEXT);
        transform.scale = Vec3::splat(plus_scale(frame.state.charge_product_factor));
    }
    let below = env.transform_coord(params.0.fixed_charge_radius) + LABEL_OFFSET;
    for mut transform in &mut q_label {
        transform.translation = (r - Vec3::Y * below).with_z(Z_TEXT);
    }
}

pub fn update_force_arrow(
    env: Res<Environment>,
    params: Res<SimParamsRes>,
    frames: Res<Frames>,
    playback: Res<PlaybackState>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut q_shaft: Query<
        (&mut Transform, &MeshMaterial2d<ColorMaterial>),
        With<ForceArrowShaft>,
    >,
    mut q_head: Query<
        (&mut Transform, &MeshMaterial2d<ColorMaterial>),
        (With<ForceArrowHead>, Without<ForceArrowShaft>),
    >,
    mut q_label: Query<
        &mut Transform,
        (
            With<ForceArrowLabel>,
            Without<ForceArrowShaft>,
            Without<ForceArrowHead>,
        ),
    >,
) {
    let frame = current_frame(&frames, &playback);
    let start = bob_px(&env, &params, frame).with_z(Z_ARROW);
    let length = env.transform_coord(frame.state.visual_force_magnitude);
    let color = force_color(
        frame.state.visual_force_magnitude,
        params.0.force_cap(),
    );

    // The arrow points along +x from the bob.
    let shaft_length = (length - ARROW_HEAD_LENGTH).max(0.0);
    for (mut transform, material) in &mut q_shaft {
        transform.translation = start + Vec3::X * (shaft_length * 0.5);
        transform.scale = Vec3::new(shaft_length.max(f32::EPSILON), 1.0, 1.0);
        if let Some(material) = materials.get_mut(&material.0) {
            material.color = color;
        }
    }
    for (mut transform, material) in &mut q_head {
        transform.translation = start + Vec3::X * (length - 0.5 * ARROW_HEAD_LENGTH).max(0.0);
        if let Some(material) = materials.get_mut(&material.0) {
            material.color = color;
        }
    }
    for mut transform in &mut q_label {
        transform.translation = (start + Vec3::X * (length + LABEL_OFFSET)).with_z(Z_TEXT);
    }
}

pub fn update_separation_line(
    env: Res<Environment>,
    params: Res<SimParamsRes>,
    frames: Res<Frames>,
    playback: Res<PlaybackState>,
    mut q_dashes: Query<&mut Transform, With<SeparationDash>>,
    mut q_label: Query<&mut Transform, (With<SeparationLabel>, Without<SeparationDash>)>,
) {
    let frame = current_frame(&frames, &playback);
    let a = bob_px(&env, &params, frame).with_z(Z_DASH);
    let b = fixed_px(&env, frame).with_z(Z_DASH);
    let span = b - a;
    let length = span.truncate().length();
    let angle = span.y.atan2(span.x);
    let dash_length = 0.55 * length / N_DASHES as f32;

    for (i, mut transform) in q_dashes.iter_mut().enumerate() {
        let t = (i as f32 + 0.5) / N_DASHES as f32;
        transform.translation = a + span * t;
        transform.rotation = Quat::from_rotation_z(angle);
        transform.scale = Vec3::new(dash_length, 1.0, 1.0);
    }

    for mut transform in &mut q_label {
        transform.translation = (a + span * 0.5 + Vec3::Y * 14.0).with_z(Z_TEXT);
    }
}

pub fn update_readout(
    frames: Res<Frames>,
    playback: Res<PlaybackState>,
    mut q_text: Query<&mut Text2d, With<ReadoutText>>,
) {
    let frame = current_frame(&frames, &playback);
    let state = &frame.state;

    let mut lines = vec![
        frame.kind.label().to_string(),
        format!("r = {:.2}", state.separation_distance),
    ];
    match frame.kind {
        DemonstrationKind::Separation => {
            lines.push(format!("r^2 = {:.2}", state.separation_distance.powi(2)));
        }
        DemonstrationKind::ChargeProduct => {
            lines.push(format!("q1*q2 = {:.2}", state.charge_product_factor));
        }
    }
    let capped = if frame.summary.capped { " (capped)" } else { "" };
    lines.push(format!(
        "F_e = {:.2}{}",
        state.visual_force_magnitude, capped
    ));
    lines.push(format!("theta = {:.3} rad", state.deflection_angle));

    for mut text in &mut q_text {
        text.0 = lines.join("\n");
    }
}
