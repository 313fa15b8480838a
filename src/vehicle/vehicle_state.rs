/// Kinematic snapshot of the vessel.
///
/// Two consecutive reads of this and [`OrbitalState`](super::OrbitalState) may straddle a
/// simulation tick; callers treat each read as a best-effort sample.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleState {
    /// Speed relative to the non-rotating frame of the orbited body in m/s.
    pub orbital_speed: f64,
    /// Speed relative to the rotating surface of the orbited body in m/s.
    pub surface_speed: f64,
    pub vertical_speed: f64,
    /// Altitude above sea level in m.
    pub mean_altitude: f64,
    /// Altitude above the terrain directly below in m.
    pub surface_altitude: f64,
    pub mass: f64,
    pub throttle: f64,
}

/// Amount of a single resource held by the currently active stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceLevel {
    pub name: String,
    pub amount: f64,
    pub capacity: f64,
}

/// Resources of the currently active stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageResources {
    /// Stage number as counted down by the simulation; `0` is the final stage.
    pub stage: i32,
    pub resources: Vec<ResourceLevel>,
}

impl StageResources {
    pub fn get(&self, name: &str) -> Option<&ResourceLevel> {
        self.resources.iter().find(|res| res.name == name)
    }
}
