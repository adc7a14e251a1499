pub mod parameters;
pub mod schedule;

use std::{error::Error, fs::File, io::Read, path::Path};

use log::info;

use self::parameters::{Parameters, ParametersYaml};
use self::schedule::{classic_schedule, Demonstration, DemonstrationConfig, DemonstrationKind};

#[derive(serde::Serialize, serde::Deserialize)]
struct ConfigYaml {
    parameters: ParametersYaml,
    // When absent, the classic two-demonstration schedule is used.
    schedule: Option<Vec<DemonstrationConfig>>,
}

pub struct SetupConfig {
    pub parameters: Parameters,
    pub schedule: Vec<DemonstrationConfig>,
}

impl SetupConfig {
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::parse_str(&contents)
    }

    pub fn parse_str(contents: &str) -> Result<Self, Box<dyn Error>> {
        let config_raw: ConfigYaml = serde_yaml::from_str(contents)?;
        let parameters = match config_raw.parameters {
            ParametersYaml::Physical(physical_params) => Parameters {
                sim_params: physical_params.as_params(),
                physical_params: Some(physical_params),
            },
            ParametersYaml::Simulation(sim_params) => Parameters {
                sim_params,
                physical_params: None,
            },
        };
        parameters.sim_params.validate()?;

        let schedule = match config_raw.schedule {
            Some(schedule) => schedule,
            None => classic_schedule(&parameters.sim_params),
        };
        Self::validate_schedule(&schedule)?;

        Ok(SetupConfig {
            parameters,
            schedule,
        })
    }

    /// The built-in setup: the classic scene and schedule.
    pub fn classic() -> Self {
        let sim_params = parameters::simulation::SimParams::classic();
        let schedule = classic_schedule(&sim_params);
        SetupConfig {
            parameters: Parameters {
                sim_params,
                physical_params: None,
            },
            schedule,
        }
    }

    pub fn demonstrations(&self) -> Vec<Demonstration> {
        self.schedule
            .iter()
            .map(|c| c.build(&self.parameters.sim_params))
            .collect()
    }

    fn validate_schedule(schedule: &[DemonstrationConfig]) -> Result<(), Box<dyn Error>> {
        for (i, demo) in schedule.iter().enumerate() {
            if demo.waypoints.is_empty() {
                return Err(format!("demonstration {} has no waypoints", i).into());
            }
            for w in &demo.waypoints {
                if w.over < 0.0 || w.hold < 0.0 {
                    return Err(
                        format!("demonstration {} has a negative duration", i).into()
                    );
                }
                if demo.kind == DemonstrationKind::ChargeProduct && w.target < 0.0 {
                    return Err(format!(
                        "demonstration {}: charge-product factor must be non-negative, got {}",
                        i, w.target
                    )
                    .into());
                }
            }
        }
        Ok(())
    }

    pub fn print(&self) {
        if let Some(physical_params) = &self.parameters.physical_params {
            info!(
                "\
Physical parameters:
  Charges: {q1} nC, {q2} nC
  Bob mass: {mass} g
  String length: {length} cm
  Restoring force: {f_g} mN
  Coulomb constant: {k:.3e} N·m²/C²",
                q1 = 1e9 * physical_params.charge_1,
                q2 = 1e9 * physical_params.charge_2,
                mass = 1e3 * physical_params.bob_mass,
                length = 1e2 * physical_params.string_length,
                f_g = 1e3 * physical_params.bob_mass * physical_params.gravity,
                k = physical_params.coulomb_constant(),
            );
        }
        let sim_params = &self.parameters.sim_params;
        info!(
            "\
Scene parameters:
  Timestep: {dt:.4} s
  Pendulum length: {length}
  Restoring force scale: {force_scale}
  Equilibrium angle: {theta_eq:.4} rad

Derived calibration:
  Equilibrium separation: {r_eq:.4}
  Coulomb base: {base:.4}
  Force cap: {cap:.2}

Schedule: {n} demonstration(s)",
            dt = sim_params.dt,
            length = sim_params.pendulum_length,
            force_scale = sim_params.force_scale,
            theta_eq = sim_params.theta_equilibrium,
            r_eq = sim_params.equilibrium_separation(),
            base = sim_params.coulomb_scaled_base(),
            cap = sim_params.force_cap(),
            n = self.schedule.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_simulation_route() {
        let yaml = "
parameters:
  type: Simulation
  dt: 0.016666666666666666
  pivot: [0.0, 2.5]
  pendulum_length: 2.5
  bob_radius: 0.2
  fixed_charge_radius: 0.25
  fixed_charge_position: [-1.8, 0.0]
  force_scale: 1.2
  theta_equilibrium: 0.5235987755982988
  separation_floor: 0.1
  theta_cap: 1.5079644737231007
";
        let config = SetupConfig::parse_str(yaml).unwrap();
        assert!(config.parameters.physical_params.is_none());
        assert_relative_eq!(config.parameters.sim_params.force_scale, 1.2);
        // No schedule given: the classic one applies.
        assert_eq!(config.schedule.len(), 2);
    }

    #[test]
    fn test_parse_with_explicit_schedule() {
        let yaml = "
parameters:
  type: Simulation
  dt: 0.02
  pivot: [0.0, 2.5]
  pendulum_length: 2.5
  bob_radius: 0.2
  fixed_charge_radius: 0.25
  fixed_charge_position: [-1.8, 0.0]
  force_scale: 1.2
  theta_equilibrium: 0.5235987755982988
  separation_floor: 0.1
  theta_cap: 1.5079644737231007
schedule:
  - kind: ChargeProduct
    waypoints:
      - { target: 2.0, over: 1.0, hold: 0.5 }
    ease: Linear
";
        let config = SetupConfig::parse_str(yaml).unwrap();
        assert_eq!(config.schedule.len(), 1);
        let demos = config.demonstrations();
        assert_relative_eq!(demos[0].duration(), 1.5);
    }

    #[test]
    fn test_negative_charge_product_is_rejected() {
        let yaml = "
parameters:
  type: Simulation
  dt: 0.02
  pivot: [0.0, 2.5]
  pendulum_length: 2.5
  bob_radius: 0.2
  fixed_charge_radius: 0.25
  fixed_charge_position: [-1.8, 0.0]
  force_scale: 1.2
  theta_equilibrium: 0.5235987755982988
  separation_floor: 0.1
  theta_cap: 1.5079644737231007
schedule:
  - kind: ChargeProduct
    waypoints:
      - { target: -0.5, over: 1.0 }
";
        assert!(SetupConfig::parse_str(yaml).is_err());
    }

    #[test]
    fn test_classic_setup_is_valid() {
        let config = SetupConfig::classic();
        assert!(config.parameters.sim_params.validate().is_ok());
        assert_eq!(config.demonstrations().len(), 2);
    }
}
