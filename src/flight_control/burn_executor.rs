use super::{
    FlightComputer,
    common::MovingAverage,
    orbit::{DeltaVMeasure, ManeuverPlan, vis_viva_speed},
};
use crate::config::{CircularizationConfig, RateCorrection, WaitBudget};
use crate::error::{GuidanceError, GuidanceResult};
use crate::{event, info, log};
use std::time::Duration;
use tokio::time::Instant;

/// Outcome of a delta-v burn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnReport {
    pub planned: f64,
    pub achieved: f64,
    pub samples: usize,
}

/// Outcome of the feedback circularization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularizationReport {
    pub periapsis_altitude: f64,
    /// Throttle changes applied by the rate feedback.
    pub corrections: usize,
    /// Samples dropped because no simulation time had passed.
    pub skipped_samples: usize,
}

/// Throttle delta for a smoothed time-to-apoapsis rate.
///
/// Apoapsis running away (strongly negative rate) calls for more thrust, apoapsis being
/// pushed ahead (positive rate) for less. Rates in `[mild_negative, mild_positive]` are
/// the dead band and produce no change.
pub fn throttle_correction(smoothed_rate: f64, c: &RateCorrection) -> f64 {
    if smoothed_rate < c.strong_negative {
        c.strong_step
    } else if smoothed_rate < c.mild_negative {
        c.mild_step
    } else if smoothed_rate > c.strong_positive {
        -c.strong_step
    } else if smoothed_rate > c.mild_positive {
        -c.mild_step
    } else {
        0.0
    }
}

/// Next throttle setting. Corrections are clamped to `[floor, ceiling]` so the engine never
/// shuts down mid-burn; inside the dead band the current value is returned untouched.
pub fn corrected_throttle(
    current: f64,
    smoothed_rate: f64,
    c: &RateCorrection,
    floor: f64,
    ceiling: f64,
) -> f64 {
    let delta = throttle_correction(smoothed_rate, c);
    if delta == 0.0 { current } else { (current + delta).clamp(floor, ceiling) }
}

/// Drives the throttle to realize planned maneuvers.
pub struct BurnExecutor<'a> {
    f_cont: &'a FlightComputer,
}

impl<'a> BurnExecutor<'a> {
    pub fn new(f_cont: &'a FlightComputer) -> Self { Self { f_cont } }

    /// Burns at a fixed `throttle` until the measured delta-v reaches the plan.
    ///
    /// The throttle is never adjusted mid-burn; only the stopping condition is closed-loop.
    /// The engine is cut on every exit path.
    ///
    /// # Errors
    /// * [`GuidanceError::ConvergenceTimeout`] if the delta-v is not reached in budget.
    pub async fn burn_delta_v(
        &self,
        plan: &ManeuverPlan,
        throttle: f64,
        budget: WaitBudget,
    ) -> GuidanceResult<BurnReport> {
        let planned = plan.required_delta_v();
        let start = self.measure(plan.measure()).await?;
        info!("Burning {planned:.1} m/s {} at throttle {throttle:.2}.", if plan.is_prograde() { "prograde" } else { "retrograde" });
        if planned <= 0.0 {
            return Ok(BurnReport { planned, achieved: 0.0, samples: 0 });
        }
        let deadline = Instant::now() + budget.max_wait();
        let res: GuidanceResult<BurnReport> = async {
            self.f_cont.set_throttle(throttle).await?;
            let mut samples = 0;
            loop {
                tokio::time::sleep(budget.interval()).await;
                let achieved = (self.measure(plan.measure()).await? - start).abs();
                samples += 1;
                event!("Delta-v {achieved:.1} of {planned:.1} m/s");
                if achieved >= planned {
                    return Ok(BurnReport { planned, achieved, samples });
                }
                if Instant::now() >= deadline {
                    return Err(GuidanceError::ConvergenceTimeout {
                        wait: "delta-v burn",
                        budget: budget.max_wait(),
                    });
                }
            }
        }
        .await;
        let cut = self.f_cont.cut_throttle().await;
        let report = res?;
        cut?;
        log!("Burn complete: {:.1} of {planned:.1} m/s.", report.achieved);
        Ok(report)
    }

    /// Fires at `throttle` for a fixed stretch of time.
    pub async fn burn_for(&self, duration: Duration, throttle: f64) -> GuidanceResult<()> {
        info!("Burning for {:.1}s at throttle {throttle:.2}.", duration.as_secs_f64());
        let res = async {
            self.f_cont.set_throttle(throttle).await?;
            tokio::time::sleep(duration).await;
            Ok::<_, GuidanceError>(())
        }
        .await;
        let cut = self.f_cont.cut_throttle().await;
        res.and(cut)
    }

    /// Raises the periapsis to the configured altitude with rate feedback on the throttle.
    ///
    /// The rate of change of time-to-apoapsis shows whether the burn is pushing the
    /// apoapsis ahead or letting it slip. It is smoothed over a short trailing window and
    /// mapped to bounded throttle steps.
    pub async fn circularize(&self, cfg: &CircularizationConfig) -> GuidanceResult<CircularizationReport> {
        info!("Circularizing to a periapsis of {:.0} m.", cfg.target_periapsis);
        let deadline = Instant::now() + cfg.burn_budget.max_wait();
        let res: GuidanceResult<CircularizationReport> = async {
            let mut throttle = cfg.initial_throttle.clamp(cfg.throttle_floor, cfg.throttle_ceiling);
            self.f_cont.set_throttle(throttle).await?;
            let mut smoother = MovingAverage::new(cfg.smoothing_window);
            let mut last_ut = self.f_cont.ut().await?;
            let mut last_tta = self.f_cont.orbit().await?.time_to_apoapsis;
            let mut corrections = 0;
            let mut skipped_samples = 0;
            loop {
                let periapsis_altitude = self.f_cont.orbit().await?.periapsis_altitude;
                if periapsis_altitude >= cfg.target_periapsis {
                    return Ok(CircularizationReport { periapsis_altitude, corrections, skipped_samples });
                }
                if Instant::now() >= deadline {
                    return Err(GuidanceError::ConvergenceTimeout {
                        wait: "circularization",
                        budget: cfg.burn_budget.max_wait(),
                    });
                }
                tokio::time::sleep(cfg.burn_budget.interval()).await;
                let tta = self.f_cont.orbit().await?.time_to_apoapsis;
                let ut = self.f_cont.ut().await?;
                let dt = ut - last_ut;
                if dt < cfg.min_sample_dt {
                    event!("No simulation time passed since the last sample, rate update skipped.");
                    skipped_samples += 1;
                    continue;
                }
                let smoothed = smoother.push((tta - last_tta) / dt);
                event!("Smoothed time-to-apoapsis rate: {smoothed:.3}");
                let next = corrected_throttle(
                    throttle,
                    smoothed,
                    &cfg.correction,
                    cfg.throttle_floor,
                    cfg.throttle_ceiling,
                );
                if (next - throttle).abs() > f64::EPSILON {
                    self.f_cont.set_throttle(next).await?;
                    throttle = next;
                    corrections += 1;
                }
                last_tta = tta;
                last_ut = ut;
            }
        }
        .await;
        let cut = self.f_cont.cut_throttle().await;
        let report = res?;
        cut?;
        log!(
            "Periapsis at {:.0} m after {} throttle corrections.",
            report.periapsis_altitude,
            report.corrections
        );
        Ok(report)
    }

    async fn measure(&self, measure: DeltaVMeasure) -> GuidanceResult<f64> {
        match measure {
            DeltaVMeasure::SpeedChange => Ok(self.f_cont.state().await?.orbital_speed),
            DeltaVMeasure::VisVivaSpeed => {
                let orbit = self.f_cont.orbit().await?;
                Ok(vis_viva_speed(orbit.gravitational_parameter, orbit.radius, orbit.semi_major_axis))
            }
        }
    }
}
