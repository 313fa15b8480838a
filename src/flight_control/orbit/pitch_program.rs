use crate::error::{GuidanceError, GuidanceResult};

/// Gravity-turn pitch schedule driven by the current apoapsis altitude.
///
/// `pitch = 90 - k * apoapsis^p`, where `k` puts the pitch at exactly 0° when the
/// apoapsis reaches the target. Exponents above 1 keep the climb near vertical for
/// longer before leveling off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchProgram {
    target_apoapsis: f64,
    exponent: f64,
    gain: f64,
}

impl PitchProgram {
    pub const VERTICAL: f64 = 90.0;
    pub const HORIZONTAL: f64 = 0.0;

    /// # Errors
    /// * [`GuidanceError::PlanningFailure`] for a non-positive target or exponent.
    pub fn new(target_apoapsis: f64, exponent: f64) -> GuidanceResult<Self> {
        if !(target_apoapsis > 0.0 && exponent > 0.0) {
            return Err(GuidanceError::PlanningFailure(format!(
                "pitch program needs a positive target apoapsis and exponent, got {target_apoapsis} and {exponent}"
            )));
        }
        Ok(Self { target_apoapsis, exponent, gain: Self::VERTICAL / target_apoapsis.powf(exponent) })
    }

    pub fn target_apoapsis(&self) -> f64 { self.target_apoapsis }

    pub fn exponent(&self) -> f64 { self.exponent }

    /// Target pitch in degrees above the horizon, always within `[0, 90]`.
    ///
    /// Apoapsis altitudes below the surface (as reported on the pad) count as zero.
    pub fn pitch_at(&self, apoapsis_altitude: f64) -> f64 {
        let apoapsis = apoapsis_altitude.max(0.0);
        (Self::VERTICAL - self.gain * apoapsis.powf(self.exponent))
            .clamp(Self::HORIZONTAL, Self::VERTICAL)
    }

    /// Apoapsis altitude at which the engines are cut, `margin` short of the target.
    pub fn cutoff_altitude(&self, margin: f64) -> f64 {
        (self.target_apoapsis - margin.max(0.0)).max(0.0)
    }

    pub fn should_cut_off(&self, apoapsis_altitude: f64, margin: f64) -> bool {
        apoapsis_altitude >= self.cutoff_altitude(margin)
    }
}
