use super::{DeltaVMeasure, ManeuverPlan, PitchProgram};
use crate::flight_control::common::{clamped_acos, clamped_sqrt};
use crate::error::{GuidanceError, GuidanceResult};
use crate::vehicle::OrbitalState;
use std::f64::consts::PI;

/// Orbital speed at radius `r` on an orbit with semi-major axis `a` (vis-viva).
///
/// Radii beyond the reach of the orbit (`r > 2a` on a bound orbit) give `0` rather than
/// `NaN`.
pub fn vis_viva_speed(mu: f64, r: f64, a: f64) -> f64 { clamped_sqrt(mu * (2.0 / r - 1.0 / a)) }

/// Speed of a circular orbit of radius `r`.
pub fn circular_speed(mu: f64, r: f64) -> f64 { clamped_sqrt(mu / r) }

/// Prograde delta-v at radius `r` to move from the current orbit onto a transfer ellipse
/// reaching out to `r_target`.
pub fn transfer_delta_v(mu: f64, r: f64, a_current: f64, r_target: f64) -> f64 {
    let a_transfer = (r + r_target) / 2.0;
    vis_viva_speed(mu, r, a_transfer) - vis_viva_speed(mu, r, a_current)
}

/// Braking delta-v at apoapsis that moves the periapsis to `r_target_periapsis` while
/// keeping the apoapsis. Negative when the periapsis has to be raised instead.
pub fn apoapsis_braking_delta_v(
    mu: f64,
    r_apoapsis: f64,
    a_current: f64,
    r_target_periapsis: f64,
) -> f64 {
    let a_target = (r_apoapsis + r_target_periapsis) / 2.0;
    vis_viva_speed(mu, r_apoapsis, a_current) - vis_viva_speed(mu, r_apoapsis, a_target)
}

/// Geometry of a half-ellipse transfer between two circular orbits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HohmannTransfer {
    /// Semi-major axis of the transfer ellipse in m.
    pub semi_major_axis: f64,
    /// Half the period of the transfer ellipse in s.
    pub transfer_time: f64,
    /// Mean angular rate of the target body in rad/s.
    pub target_angular_rate: f64,
    /// Angle the target body covers during the transfer, in degrees.
    pub target_travel_deg: f64,
    /// Angle the target has to lead the vessel by at departure, in degrees.
    pub optimal_phase_deg: f64,
}

impl HohmannTransfer {
    /// # Arguments
    /// * `mu` – Gravitational parameter of the departure body.
    /// * `r_departure` – Orbital radius of the vessel.
    /// * `r_target` – Orbital radius of the target body.
    ///
    /// # Errors
    /// * [`GuidanceError::PlanningFailure`] if any input is not strictly positive.
    pub fn between(mu: f64, r_departure: f64, r_target: f64) -> GuidanceResult<Self> {
        ensure_positive("gravitational parameter", mu)?;
        ensure_positive("departure radius", r_departure)?;
        ensure_positive("target radius", r_target)?;
        let semi_major_axis = (r_departure + r_target) / 2.0;
        let transfer_time = PI * (semi_major_axis.powi(3) / mu).sqrt();
        let target_angular_rate = (mu / r_target.powi(3)).sqrt();
        let target_travel_deg = (target_angular_rate * transfer_time).to_degrees();
        Ok(Self {
            semi_major_axis,
            transfer_time,
            target_angular_rate,
            target_travel_deg,
            optimal_phase_deg: 180.0 - target_travel_deg,
        })
    }

    /// The optimal phase angle folded into the unsigned `[0, 180]` range that a
    /// law-of-cosines measurement can report.
    pub fn optimal_separation_deg(&self) -> f64 {
        clamped_acos(self.optimal_phase_deg.to_radians().cos()).to_degrees()
    }
}

/// Builds maneuver plans from live orbital state. Pure computation, no side effects.
pub struct ManeuverPlanner;

impl ManeuverPlanner {
    /// Gravity turn towards `target_apoapsis`.
    pub fn plan_ascent(target_apoapsis: f64, exponent: f64) -> GuidanceResult<ManeuverPlan> {
        Ok(ManeuverPlan::ascent(PitchProgram::new(target_apoapsis, exponent)?))
    }

    /// Departure burn onto a transfer ellipse reaching `target_radius`, burned now.
    pub fn plan_transfer(orbit: &OrbitalState, target_radius: f64) -> GuidanceResult<ManeuverPlan> {
        Self::check_orbit(orbit)?;
        ensure_positive("target radius", target_radius)?;
        let dv = transfer_delta_v(
            orbit.gravitational_parameter,
            orbit.radius,
            orbit.semi_major_axis,
            target_radius,
        );
        Ok(ManeuverPlan::along_velocity(dv, DeltaVMeasure::VisVivaSpeed))
    }

    /// Apoapsis burn that puts the periapsis at `target_periapsis_altitude`.
    pub fn plan_periapsis_correction(
        orbit: &OrbitalState,
        target_periapsis_altitude: f64,
    ) -> GuidanceResult<ManeuverPlan> {
        Self::check_orbit(orbit)?;
        let r_target = orbit.equatorial_radius + target_periapsis_altitude;
        ensure_positive("target periapsis radius", r_target)?;
        let dv = apoapsis_braking_delta_v(
            orbit.gravitational_parameter,
            orbit.apoapsis_radius(),
            orbit.semi_major_axis,
            r_target,
        );
        Ok(ManeuverPlan::braking(dv, DeltaVMeasure::SpeedChange))
    }

    /// Periapsis burn that turns the current orbit into a circle at the periapsis radius.
    ///
    /// # Arguments
    /// * `orbit` – Orbit around the capturing body, sampled at periapsis.
    /// * `current_speed` – Measured speed relative to the capturing body.
    pub fn plan_circular_capture(
        orbit: &OrbitalState,
        current_speed: f64,
    ) -> GuidanceResult<ManeuverPlan> {
        ensure_positive("gravitational parameter", orbit.gravitational_parameter)?;
        let r_periapsis = orbit.periapsis_radius();
        ensure_positive("periapsis radius", r_periapsis)?;
        let target = circular_speed(orbit.gravitational_parameter, r_periapsis);
        Ok(ManeuverPlan::braking(current_speed - target, DeltaVMeasure::SpeedChange))
    }

    fn check_orbit(orbit: &OrbitalState) -> GuidanceResult<()> {
        ensure_positive("gravitational parameter", orbit.gravitational_parameter)?;
        ensure_positive("orbital radius", orbit.radius)?;
        ensure_positive("semi-major axis", orbit.semi_major_axis)
    }
}

fn ensure_positive(what: &str, value: f64) -> GuidanceResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(GuidanceError::PlanningFailure(format!("{what} must be positive and finite, got {value}")))
    }
}
