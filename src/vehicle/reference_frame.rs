use nalgebra::Vector3;
use std::fmt;

/// Reference frames the autopilot and position queries can be expressed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceFrame {
    /// Vessel-centred frame aligned with the orbital velocity (y axis = prograde).
    Orbital,
    /// Vessel-centred frame aligned with the surface velocity (y axis = surface prograde).
    SurfaceVelocity,
    /// Vessel-centred frame aligned with the local horizon, used for heading/pitch targets.
    Surface,
    /// Frame centred on the named celestial body.
    BodyCentred(String),
}

/// An object whose position can be sampled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceObject {
    Vessel,
    Body(String),
}

impl fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Orbital => write!(f, "orbital"),
            Self::SurfaceVelocity => write!(f, "surface velocity"),
            Self::Surface => write!(f, "surface"),
            Self::BodyCentred(body) => write!(f, "{body}-centred"),
        }
    }
}

impl fmt::Display for SpaceObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vessel => write!(f, "vessel"),
            Self::Body(body) => write!(f, "{body}"),
        }
    }
}

/// Orientation requested from the external autopilot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttitudeTarget {
    /// Unit vector in the engaged reference frame.
    Direction(Vector3<f64>),
    /// Compass heading and pitch above the horizon, both in degrees.
    HeadingPitch { heading: f64, pitch: f64 },
}

impl AttitudeTarget {
    /// Orbital prograde in [`ReferenceFrame::Orbital`].
    pub fn prograde() -> Self { Self::Direction(Vector3::new(0.0, 1.0, 0.0)) }

    /// Orbital retrograde in [`ReferenceFrame::Orbital`], also surface retrograde in
    /// [`ReferenceFrame::SurfaceVelocity`].
    pub fn retrograde() -> Self { Self::Direction(Vector3::new(0.0, -1.0, 0.0)) }
}
