use super::parameters::simulation::SimParams;

/// Interpolation applied within each waypoint's travel time. `Smooth` is a
/// quintic smoothstep.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub enum Ease {
    Linear,
    #[default]
    Smooth,
}

impl Ease {
    pub fn apply(&self, s: f64) -> f64 {
        let s = s.clamp(0.0, 1.0);
        match self {
            Ease::Linear => s,
            Ease::Smooth => s * s * s * (10.0 - 15.0 * s + 6.0 * s * s),
        }
    }
}

/// One leg of a parameter track: travel to `target` over `over` seconds,
/// then stay there for `hold` seconds.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct Waypoint {
    pub target: f64,
    pub over: f64,
    #[serde(default)]
    pub hold: f64,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum DemonstrationKind {
    // The fixed charge slides along x; separation follows the scene geometry.
    Separation,
    // The charge-product factor varies; separation stays pinned.
    ChargeProduct,
}

impl DemonstrationKind {
    pub fn label(&self) -> &'static str {
        match self {
            DemonstrationKind::Separation => "F_e vs r",
            DemonstrationKind::ChargeProduct => "F_e vs q1*q2",
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct DemonstrationConfig {
    pub kind: DemonstrationKind,
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub ease: Ease,
}

impl DemonstrationConfig {
    pub fn build(&self, params: &SimParams) -> Demonstration {
        let start = match self.kind {
            DemonstrationKind::Separation => params.fixed_charge_position.x,
            DemonstrationKind::ChargeProduct => 1.0,
        };
        Demonstration {
            kind: self.kind,
            track: Track {
                start,
                waypoints: self.waypoints.clone(),
                ease: self.ease,
            },
        }
    }
}

/// A piecewise scalar drive: start value, then a chain of waypoints.
#[derive(Debug, Clone)]
pub struct Track {
    pub start: f64,
    pub waypoints: Vec<Waypoint>,
    pub ease: Ease,
}

impl Track {
    pub fn duration(&self) -> f64 {
        self.waypoints.iter().map(|w| w.over + w.hold).sum()
    }

    pub fn sample(&self, t: f64) -> f64 {
        let mut from = self.start;
        let mut elapsed = 0.0;
        for w in &self.waypoints {
            if t < elapsed + w.over {
                let s = (t - elapsed) / w.over;
                return from + (w.target - from) * self.ease.apply(s);
            }
            elapsed += w.over;
            if t < elapsed + w.hold {
                return w.target;
            }
            elapsed += w.hold;
            from = w.target;
        }
        from
    }
}

/// The per-frame value the schedule feeds the updater.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drive {
    Separation { fixed_charge_x: f64 },
    ChargeProduct { factor: f64 },
}

#[derive(Debug, Clone)]
pub struct Demonstration {
    pub kind: DemonstrationKind,
    pub track: Track,
}

impl Demonstration {
    pub fn duration(&self) -> f64 {
        self.track.duration()
    }

    pub fn drive_at(&self, t: f64) -> Drive {
        let v = self.track.sample(t);
        match self.kind {
            DemonstrationKind::Separation => Drive::Separation { fixed_charge_x: v },
            DemonstrationKind::ChargeProduct => Drive::ChargeProduct { factor: v },
        }
    }
}

/// The classic two-demonstration schedule: bring the fixed charge in close,
/// pull it far out, return it; then sweep the charge product up, down, and
/// back to baseline.
pub fn classic_schedule(params: &SimParams) -> Vec<DemonstrationConfig> {
    let bob_eq = params.equilibrium_bob_position();
    let x_rest = params.fixed_charge_position.x;
    let x_close = bob_eq.x - (params.bob_radius + params.fixed_charge_radius + 0.3);
    let x_far = x_rest - 1.5;

    vec![
        DemonstrationConfig {
            kind: DemonstrationKind::Separation,
            waypoints: vec![
                Waypoint { target: x_close, over: 3.0, hold: 1.0 },
                Waypoint { target: x_far, over: 4.0, hold: 1.0 },
                Waypoint { target: x_rest, over: 3.0, hold: 1.0 },
            ],
            ease: Ease::Smooth,
        },
        DemonstrationConfig {
            kind: DemonstrationKind::ChargeProduct,
            waypoints: vec![
                Waypoint { target: 2.5, over: 3.0, hold: 1.0 },
                Waypoint { target: 0.2, over: 3.5, hold: 1.0 },
                Waypoint { target: 1.0, over: 2.0, hold: 1.0 },
            ],
            ease: Ease::Smooth,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn track(ease: Ease) -> Track {
        Track {
            start: 1.0,
            waypoints: vec![
                Waypoint { target: 2.5, over: 3.0, hold: 1.0 },
                Waypoint { target: 0.2, over: 3.5, hold: 1.0 },
            ],
            ease,
        }
    }

    #[test]
    fn test_duration_sums_travel_and_hold() {
        assert_relative_eq!(track(Ease::Smooth).duration(), 8.5);
    }

    #[test]
    fn test_sample_hits_waypoints_and_holds() {
        let tr = track(Ease::Smooth);
        assert_relative_eq!(tr.sample(0.0), 1.0);
        // Mid-hold after the first leg.
        assert_relative_eq!(tr.sample(3.5), 2.5);
        // Mid-hold after the second leg.
        assert_relative_eq!(tr.sample(7.8), 0.2);
        // Past the end the track stays at its last target.
        assert_relative_eq!(tr.sample(100.0), 0.2);
    }

    #[test]
    fn test_linear_midpoint() {
        let tr = track(Ease::Linear);
        assert_relative_eq!(tr.sample(1.5), 1.75);
    }

    #[test]
    fn test_smooth_ease_endpoints_and_midpoint() {
        assert_relative_eq!(Ease::Smooth.apply(0.0), 0.0);
        assert_relative_eq!(Ease::Smooth.apply(1.0), 1.0);
        assert_relative_eq!(Ease::Smooth.apply(0.5), 0.5);
        // Eases in: below linear early on.
        assert!(Ease::Smooth.apply(0.1) < 0.1);
    }

    #[test]
    fn test_drive_carries_the_kind() {
        let demo = Demonstration {
            kind: DemonstrationKind::ChargeProduct,
            track: track(Ease::Linear),
        };
        match demo.drive_at(0.0) {
            Drive::ChargeProduct { factor } => assert_relative_eq!(factor, 1.0),
            other => panic!("unexpected drive {:?}", other),
        }
    }
}
