use super::PitchProgram;
use crate::flight_control::Pointing;
use crate::vehicle::ReferenceFrame;
use crate::warn;
use nalgebra::Vector3;
use strum_macros::Display;

/// How the burn executor measures the delta-v achieved so far.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum DeltaVMeasure {
    /// Magnitude of the change in measured orbital speed since ignition.
    SpeedChange,
    /// Change in the vis-viva speed of the live orbit at the live radius since ignition.
    VisVivaSpeed,
}

/// A single planned maneuver. Immutable once computed and consumed by one burn.
#[derive(Debug, Clone, PartialEq)]
pub struct ManeuverPlan {
    /// Signed delta-v in m/s, positive along the velocity vector.
    delta_v: f64,
    /// Unit burn direction in `frame`.
    direction: Vector3<f64>,
    frame: ReferenceFrame,
    measure: DeltaVMeasure,
    /// Pitch schedule for burns steered against a changing input instead of a fixed vector.
    profile: Option<PitchProgram>,
}

impl ManeuverPlan {
    /// Burn along (positive) or against (negative) the orbital velocity.
    pub fn along_velocity(delta_v: f64, measure: DeltaVMeasure) -> Self {
        let direction = if delta_v >= 0.0 { Vector3::y() } else { -Vector3::y() };
        Self { delta_v, direction, frame: ReferenceFrame::Orbital, measure, profile: None }
    }

    /// Braking burn removing `required` m/s.
    ///
    /// A negative `required` means the orbit already sits below the target energy:
    /// the burn is flipped to prograde with the absolute value instead of failing.
    pub fn braking(required: f64, measure: DeltaVMeasure) -> Self {
        if required < 0.0 {
            warn!("Current speed is below target by {:.1} m/s, burning prograde instead.", -required);
        }
        Self::along_velocity(-required, measure)
    }

    /// Ascent steered by `profile`, starting vertical.
    pub fn ascent(profile: PitchProgram) -> Self {
        Self {
            delta_v: 0.0,
            direction: Vector3::x(),
            frame: ReferenceFrame::Surface,
            measure: DeltaVMeasure::SpeedChange,
            profile: Some(profile),
        }
    }

    pub fn delta_v(&self) -> f64 { self.delta_v }

    /// Magnitude the burn executor has to realize.
    pub fn required_delta_v(&self) -> f64 { self.delta_v.abs() }

    pub fn is_prograde(&self) -> bool { self.delta_v >= 0.0 }

    pub fn direction(&self) -> Vector3<f64> { self.direction }

    pub fn frame(&self) -> &ReferenceFrame { &self.frame }

    pub fn measure(&self) -> DeltaVMeasure { self.measure }

    pub fn profile(&self) -> Option<&PitchProgram> { self.profile.as_ref() }

    /// Attitude the vessel has to hold for this burn.
    pub fn pointing(&self) -> Pointing {
        Pointing::Direction { frame: self.frame.clone(), vector: self.direction }
    }
}
