use super::{PhaseMode, coast_mode::CoastMode};
use crate::error::{GuidanceError, GuidanceResult};
use crate::flight_control::{
    WarpSession,
    orbit::{HohmannTransfer, ManeuverPlanner, PhaseAngleTracker, PhaseObservation, phase_angle_deg},
    Pointing,
};
use crate::keychain::Keychain;
use crate::mode_control::{MissionPhase, OpExitSignal};
use crate::vehicle::{ReferenceFrame, SpaceObject};
use crate::{error, event, info, log};
use async_trait::async_trait;
use std::sync::Arc;

/// Waits in the parking orbit for the departure window towards the target body and flies
/// the prograde transfer burn.
///
/// The closed-form Hohmann angle only sets the target; the decision to burn is taken on
/// the live phase angle measured from positions.
pub(crate) struct TransferMode {}

impl TransferMode {
    const MODE_NAME: &'static str = "TransferMode";

    pub(crate) fn new() -> Self { Self {} }

    /// Current unsigned angle at the parent body between the vessel and the target.
    ///
    /// # Arguments
    /// * `k` – The keychain.
    /// * `target_radius` – Distance of the target from the parent body.
    async fn measure_phase(k: &Keychain, target_radius: f64) -> GuidanceResult<f64> {
        let f_cont = k.f_cont();
        let target = &k.config().target_body;
        let frame = ReferenceFrame::BodyCentred(target.clone());
        let vessel_radius = f_cont.orbit().await?.radius;
        let target_pos = f_cont.position(&SpaceObject::Body(target.clone()), &frame).await?;
        let vessel_pos = f_cont.position(&SpaceObject::Vessel, &frame).await?;
        Ok(phase_angle_deg(target_radius, vessel_radius, (target_pos - vessel_pos).norm()))
    }

    /// Polls the live phase angle with warp until the tracker reports convergence.
    async fn await_window(
        k: &Keychain,
        tracker: &mut PhaseAngleTracker,
        target_radius: f64,
    ) -> GuidanceResult<PhaseObservation> {
        let f_cont = k.f_cont();
        let mut session = WarpSession::acquire(&f_cont, "phase angle", k.config().transfer.phase_budget);
        let res: GuidanceResult<PhaseObservation> = async {
            loop {
                let obs = tracker.observe(Self::measure_phase(k, target_radius).await?);
                event!("Phase angle {:.2}° (optimal {:.2}°)", obs.angle_deg, tracker.optimal_deg());
                if obs.converged {
                    return Ok(obs);
                }
                session.tick(obs.warp).await?;
            }
        }
        .await;
        let released = session.release().await;
        let obs = res?;
        released?;
        Ok(obs)
    }
}

#[async_trait]
impl PhaseMode for TransferMode {
    fn type_name(&self) -> &'static str { Self::MODE_NAME }

    fn phase(&self) -> MissionPhase { MissionPhase::Transfer }

    async fn init_mode(&self, k: Arc<Keychain>) -> GuidanceResult<()> {
        let cfg = &k.config().transfer;
        let f_cont = k.f_cont();
        f_cont.set_rcs(true).await?;
        if cfg.jettison_fairings {
            f_cont.jettison_fairings().await?;
        }
        f_cont.set_panels_and_antennas(true).await?;

        let target_name = &k.config().target_body;
        let target_orbit = k.body(target_name).await?.orbit.ok_or_else(|| {
            GuidanceError::PlanningFailure(format!("{target_name} does not orbit anything"))
        })?;
        let orbit = k.orbit().await?;
        let hohmann =
            HohmannTransfer::between(orbit.gravitational_parameter, orbit.radius, target_orbit.semi_major_axis)?;
        info!(
            "Optimal phase angle to {target_name}: {:.2}°, transfer time {:.0}s.",
            hohmann.optimal_phase_deg, hohmann.transfer_time
        );

        let mut tracker = PhaseAngleTracker::new(
            hohmann.optimal_separation_deg(),
            cfg.phase_tolerance_deg,
            cfg.near_phase_band_deg,
            cfg.converging_warp,
            cfg.diverging_warp,
        );
        let director = k.director();
        director.track(&Pointing::Prograde).await?;
        let obs = match Self::await_window(&k, &mut tracker, target_orbit.radius).await {
            Ok(obs) => obs,
            Err(e) => {
                if let Err(release_err) = director.release().await {
                    error!("Failed to release the autopilot after the missed window: {release_err}");
                }
                return Err(e);
            }
        };
        log!("Departure window open at a phase angle of {:.2}°.", obs.angle_deg);

        let plan = ManeuverPlanner::plan_transfer(&k.orbit().await?, target_orbit.radius)?;
        let burns = k.burns();
        director
            .while_pointing(&plan.pointing(), || burns.burn_delta_v(&plan, cfg.throttle, cfg.burn_budget))
            .await?;
        info!("Transfer burn complete, on the way to {target_name}.");
        Ok(())
    }

    async fn exit_mode(&self, _: Arc<Keychain>) -> GuidanceResult<OpExitSignal> {
        Ok(OpExitSignal::ReInit(Box::new(CoastMode::new())))
    }
}
