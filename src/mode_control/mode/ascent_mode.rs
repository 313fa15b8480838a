use super::{PhaseMode, transfer_mode::TransferMode};
use crate::error::{GuidanceError, GuidanceResult};
use crate::flight_control::{
    Pointing,
    orbit::{ManeuverPlanner, PitchProgram},
};
use crate::keychain::Keychain;
use crate::mode_control::{MissionPhase, OpExitSignal};
use crate::{error, event, info, log};
use async_trait::async_trait;
use std::sync::Arc;

/// Gravity turn from the pad to the target apoapsis, followed by the circularization burn
/// at apoapsis that lifts the periapsis out of the atmosphere.
pub(crate) struct AscentMode {}

impl AscentMode {
    const MODE_NAME: &'static str = "AscentMode";

    pub(crate) fn new() -> Self { Self {} }

    /// Steers along the pitch program until the apoapsis reaches the cutoff altitude, then
    /// cuts the engine.
    async fn gravity_turn(k: &Keychain, profile: &PitchProgram) -> GuidanceResult<f64> {
        let cfg = &k.config().ascent;
        let f_cont = k.f_cont();
        let director = k.director();
        let heading = cfg.launch_heading;

        f_cont.set_rcs(true).await?;
        f_cont.set_throttle(cfg.launch_throttle).await?;
        director.track(&Pointing::Fixed { heading, pitch: PitchProgram::VERTICAL }).await?;
        info!(
            "Lifting off on heading {heading:.0}°, engine cutoff at {:.0} m apoapsis.",
            profile.cutoff_altitude(cfg.cutoff_margin)
        );

        let res = f_cont
            .wait_until("ascent apoapsis", cfg.poll, || async {
                let apoapsis = f_cont.orbit().await?.apoapsis_altitude;
                if profile.should_cut_off(apoapsis, cfg.cutoff_margin) {
                    return Ok(true);
                }
                let pitch = profile.pitch_at(apoapsis);
                event!("Apoapsis {apoapsis:.0} m, target pitch {pitch:.2}°");
                director.track(&Pointing::Fixed { heading, pitch }).await?;
                Ok::<_, GuidanceError>(false)
            })
            .await;
        let cut = f_cont.cut_throttle().await;
        if let Err(e) = res {
            if let Err(release_err) = director.release().await {
                error!("Failed to release the autopilot after an aborted ascent: {release_err}");
            }
            return Err(e);
        }
        cut?;
        Ok(f_cont.orbit().await?.apoapsis_altitude)
    }
}

#[async_trait]
impl PhaseMode for AscentMode {
    fn type_name(&self) -> &'static str { Self::MODE_NAME }

    fn phase(&self) -> MissionPhase { MissionPhase::Ascent }

    async fn init_mode(&self, k: Arc<Keychain>) -> GuidanceResult<()> {
        let cfg = k.config();
        let plan = ManeuverPlanner::plan_ascent(cfg.ascent.target_apoapsis, cfg.ascent.profile_exponent)?;
        let profile = plan
            .profile()
            .ok_or_else(|| GuidanceError::PlanningFailure(String::from("ascent plan without pitch program")))?;
        let apoapsis = Self::gravity_turn(&k, profile).await?;
        log!("Engine cutoff with apoapsis at {apoapsis:.0} m.");

        let circ = &cfg.circularization;
        let f_cont = k.f_cont();
        f_cont
            .warp_until("circularization lead", circ.apoapsis_warp, circ.lead_budget, || async {
                Ok::<_, GuidanceError>(Some(f_cont.orbit().await?.time_to_apoapsis))
            })
            .await?;
        let burns = k.burns();
        let report = k.director().while_pointing(&Pointing::Prograde, || burns.circularize(circ)).await?;
        let orbit = f_cont.orbit().await?;
        info!(
            "Parking orbit reached: apoapsis {:.0} m, periapsis {:.0} m.",
            orbit.apoapsis_altitude, report.periapsis_altitude
        );
        Ok(())
    }

    async fn exit_mode(&self, _: Arc<Keychain>) -> GuidanceResult<OpExitSignal> {
        Ok(OpExitSignal::ReInit(Box::new(TransferMode::new())))
    }
}
