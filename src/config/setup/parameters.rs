pub mod physical;
pub mod simulation;

use self::{physical::PhysicalParams, simulation::SimParams};

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ParametersYaml {
    Physical(PhysicalParams),
    Simulation(SimParams),
}

pub struct Parameters {
    pub sim_params: SimParams,
    pub physical_params: Option<PhysicalParams>,
}
