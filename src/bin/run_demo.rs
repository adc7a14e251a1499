use clap::Parser;
use log::info;
use pendulo::{
    config::{run::RunParams, setup::SetupConfig},
    dynamics::run,
};

#[derive(Debug, clap::Parser)]
#[command(name = "pendulo_run", about = "Run the demonstration schedule headlessly...")]
pub struct RunCli {
    #[arg(short = 's', long = "setup")]
    pub setup: Option<std::path::PathBuf>,

    #[arg(short = 'd', long = "dt-log", default_value = "0.5")]
    pub dt_log: f64,

    #[arg(long = "csv")]
    pub csv: Option<std::path::PathBuf>,
}

#[derive(serde::Serialize)]
struct TraceRow<'a> {
    demonstration: &'a str,
    step: usize,
    t: f64,
    separation: f64,
    charge_product: f64,
    force: f64,
    deflection: f64,
    capped: bool,
}

fn main() {
    env_logger::init();
    let args = RunCli::parse();

    let setup_config = match &args.setup {
        Some(path) => {
            info!("Loading setup from {}", path.display());
            SetupConfig::parse(path).unwrap()
        }
        None => {
            info!("No setup specified, using the classic scene");
            SetupConfig::classic()
        }
    };
    setup_config.print();

    let sim_params = &setup_config.parameters.sim_params;
    let run_params = RunParams {
        dstep_log: sim_params.to_steps(args.dt_log).max(1),
    };

    let frames = run(sim_params, &setup_config.demonstrations(), &run_params);
    info!("Produced {} frames", frames.len());

    if let Some(path) = &args.csv {
        let mut wtr = csv::Writer::from_path(path).unwrap();
        for frame in &frames {
            wtr.serialize(TraceRow {
                demonstration: frame.kind.label(),
                step: frame.state.step,
                t: frame.state.t,
                separation: frame.state.separation_distance,
                charge_product: frame.state.charge_product_factor,
                force: frame.state.visual_force_magnitude,
                deflection: frame.state.deflection_angle,
                capped: frame.summary.capped,
            })
            .unwrap();
        }
        wtr.flush().unwrap();
        info!("Wrote trace to {}", path.display());
    }

    info!("Done!");
}
