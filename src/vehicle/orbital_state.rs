/// Snapshot of the vessel's current orbit.
///
/// Every read yields a fresh value; nothing here may be cached across phases because the
/// orbit keeps changing while the simulation runs.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalState {
    /// Name of the body currently being orbited.
    pub body: String,
    /// Gravitational parameter of `body` in m³/s².
    pub gravitational_parameter: f64,
    /// Equatorial radius of `body` in m.
    pub equatorial_radius: f64,
    /// Semi-major axis in m.
    pub semi_major_axis: f64,
    /// Apoapsis altitude above the equatorial radius in m.
    pub apoapsis_altitude: f64,
    /// Periapsis altitude above the equatorial radius in m.
    pub periapsis_altitude: f64,
    /// Seconds until the next apoapsis passage.
    pub time_to_apoapsis: f64,
    /// Seconds until the next periapsis passage.
    pub time_to_periapsis: f64,
    /// Current distance from the centre of `body` in m.
    pub radius: f64,
    /// Seconds until the vessel leaves the current sphere of influence, if it will.
    pub time_to_soi_change: Option<f64>,
    /// Seconds from the next SOI change to the periapsis of the patched orbit after it.
    pub next_time_to_periapsis: Option<f64>,
}

impl OrbitalState {
    /// Apoapsis measured from the body centre.
    pub fn apoapsis_radius(&self) -> f64 { self.apoapsis_altitude + self.equatorial_radius }

    /// Periapsis measured from the body centre.
    pub fn periapsis_radius(&self) -> f64 { self.periapsis_altitude + self.equatorial_radius }

    pub fn is_around(&self, body: &str) -> bool { self.body == body }
}

/// Orbit of a celestial body around its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyOrbit {
    pub semi_major_axis: f64,
    /// Current distance from the parent body's centre.
    pub radius: f64,
}

/// Constants and current orbit of a celestial body, as reported by the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub name: String,
    pub gravitational_parameter: f64,
    pub equatorial_radius: f64,
    /// `None` for the root body of the system.
    pub orbit: Option<BodyOrbit>,
}
