use std::time::Duration;

use bevy::{prelude::*, time::common_conditions::on_timer};
use clap::Parser;
use log::info;
use pendulo::{
    config::{run::RunParams, setup::SetupConfig},
    dynamics,
    view::{
        common::{self, Environment, Frames, PlaybackState, SimParamsRes, TIME_STEP},
        graph::{self, GraphLayout},
        scene,
    },
};

#[derive(Debug, clap::Parser)]
#[command(name = "pendulo_view", about = "Play the demonstration schedule...")]
struct ViewCli {
    #[arg(short = 's', long = "setup")]
    pub setup: Option<std::path::PathBuf>,

    #[arg(short = 'w', long = "window-size", default_value = "800.0")]
    pub window_size: f64,

    #[arg(short = 'l', long = "length-factor", default_value = "140.0")]
    pub length_factor: f64,
}

fn advance_playback(frames: Res<Frames>, mut playback: ResMut<PlaybackState>) {
    if !playback.playing {
        return;
    }
    // Loop the schedule.
    playback.i = if playback.i + 1 >= frames.0.len() {
        0
    } else {
        playback.i + 1
    };
}

fn update_playback(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    frames: Res<Frames>,
    mut playback: ResMut<PlaybackState>,
) {
    if keyboard_input.just_pressed(KeyCode::Space) {
        playback.playing = !playback.playing;
        return;
    }

    if keyboard_input.just_pressed(KeyCode::Digit0) {
        playback.i = 0;
        return;
    }

    let backward = if keyboard_input.pressed(KeyCode::ArrowLeft) {
        Some(true)
    } else if keyboard_input.pressed(KeyCode::ArrowRight) {
        Some(false)
    } else {
        None
    };
    if let Some(backward) = backward {
        playback.i = common::increment_step(
            playback.i,
            backward,
            frames.0.len() - 1,
            playback.stepsize,
        );
        return;
    }

    let slowards = if keyboard_input.pressed(KeyCode::ArrowDown) {
        Some(true)
    } else if keyboard_input.pressed(KeyCode::ArrowUp) {
        Some(false)
    } else {
        None
    };
    if let Some(slowards) = slowards {
        let new_step = playback.stepsize as i64 + (if slowards { -1 } else { 1 });
        playback.stepsize = if new_step >= 1 { new_step as usize } else { 1 };
    }
}

fn main() {
    env_logger::init();
    let args = ViewCli::parse();

    let setup_config = match &args.setup {
        Some(path) => SetupConfig::parse(path).unwrap(),
        None => SetupConfig::classic(),
    };
    setup_config.print();

    let sim_params = setup_config.parameters.sim_params.clone();
    let run_params = RunParams {
        dstep_log: sim_params.to_steps(5.0).max(1),
    };
    let frames = dynamics::run(&sim_params, &setup_config.demonstrations(), &run_params);
    assert!(!frames.is_empty(), "schedule produced no frames");
    info!("Precomputed {} frames", frames.len());

    let env = Environment {
        length_factor: args.length_factor,
    };
    let graph_layout = GraphLayout::new(&sim_params);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "pendulo".to_string(),
                resolution: (1.5 * args.window_size as f32, args.window_size as f32).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(env)
        .insert_resource(graph_layout)
        .insert_resource(Frames(frames))
        .insert_resource(SimParamsRes(sim_params))
        .insert_resource(PlaybackState::default())
        .add_systems(Startup, scene::add_camera)
        .add_systems(Startup, scene::add_scene)
        .add_systems(Startup, graph::add_graph)
        .add_systems(
            Update,
            (
                scene::update_bob,
                scene::update_bob_plus,
                scene::update_bob_label,
                scene::update_string,
                scene::update_fixed_charge,
                scene::update_force_arrow,
                scene::update_separation_line,
                scene::update_readout,
                graph::update_graph,
            ),
        )
        .add_systems(
            Update,
            (
                update_playback,
                advance_playback.run_if(on_timer(Duration::from_secs_f64(TIME_STEP))),
            ),
        )
        .add_systems(Update, common::close_on_esc)
        .run();

    info!("Done!");
}
