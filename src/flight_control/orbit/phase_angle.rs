use crate::flight_control::{WarpDecision, common::clamped_acos};

/// Cosine of the angle at the parent body between the vessel and the target, from the
/// law of cosines over the two orbital radii and the vessel-target distance.
///
/// Inconsistent samples (the two radii and the distance read across a simulation tick)
/// can push the ratio outside `[-1, 1]`; it is clamped there. Degenerate zero radii yield
/// `0`.
pub fn law_of_cosines_argument(target_radius: f64, vessel_radius: f64, distance: f64) -> f64 {
    let arg = (target_radius.powi(2) + vessel_radius.powi(2) - distance.powi(2))
        / (2.0 * target_radius * vessel_radius);
    if arg.is_nan() { 0.0 } else { arg.clamp(-1.0, 1.0) }
}

/// Current unsigned phase angle in degrees, within `[0, 180]`.
pub fn phase_angle_deg(target_radius: f64, vessel_radius: f64, distance: f64) -> f64 {
    clamped_acos(law_of_cosines_argument(target_radius, vessel_radius, distance)).to_degrees()
}

/// One evaluated phase-angle sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseObservation {
    pub angle_deg: f64,
    pub decreasing: bool,
    pub converged: bool,
    pub warp: WarpDecision,
}

/// Follows the live phase angle towards the optimal departure angle.
///
/// Convergence needs the angle to be within tolerance *and* closing in; matching the
/// optimal value while the gap is opening belongs to the wrong side of the orbit.
#[derive(Debug, Clone)]
pub struct PhaseAngleTracker {
    optimal_deg: f64,
    tolerance_deg: f64,
    near_band_deg: f64,
    converging_warp: u32,
    diverging_warp: u32,
    previous: Option<f64>,
}

impl PhaseAngleTracker {
    pub fn new(
        optimal_deg: f64,
        tolerance_deg: f64,
        near_band_deg: f64,
        converging_warp: u32,
        diverging_warp: u32,
    ) -> Self {
        Self { optimal_deg, tolerance_deg, near_band_deg, converging_warp, diverging_warp, previous: None }
    }

    pub fn optimal_deg(&self) -> f64 { self.optimal_deg }

    /// Feeds the next measured angle. The first sample never counts as decreasing.
    pub fn observe(&mut self, angle_deg: f64) -> PhaseObservation {
        let decreasing = self.previous.is_some_and(|prev| prev - angle_deg > 0.0);
        self.previous = Some(angle_deg);
        let gap = (angle_deg - self.optimal_deg).abs();
        let warp = match (decreasing, gap > self.near_band_deg) {
            (true, true) => WarpDecision::accelerated(self.converging_warp),
            (true, false) => WarpDecision::REAL_TIME,
            (false, _) => WarpDecision::accelerated(self.diverging_warp),
        };
        PhaseObservation { angle_deg, decreasing, converged: decreasing && gap <= self.tolerance_deg, warp }
    }
}
