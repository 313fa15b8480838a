use super::{
    PhaseMode, correction_mode::CorrectionMode, insertion_mode::InsertionMode,
    reentry_mode::ReentryMode,
};
use crate::config::{MissionVariant, WaitBudget};
use crate::error::{GuidanceError, GuidanceResult};
use crate::flight_control::{Pointing, WaitStep, WarpPolicy};
use crate::keychain::Keychain;
use crate::mode_control::{MissionPhase, OpExitSignal};
use crate::{info, log};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};

/// Coast between spheres of influence.
///
/// On a flyby this covers the whole arc around the target body, including the short
/// prograde kick at its periapsis that bends the trajectory back home. On a capture
/// mission it ends on arrival in the target's sphere of influence.
pub(crate) struct CoastMode {}

impl CoastMode {
    const MODE_NAME: &'static str = "CoastMode";

    pub(crate) fn new() -> Self { Self {} }

    /// Warps until the vessel orbits `body`, paced by the time to the next SOI change.
    async fn coast_into(k: &Keychain, body: &str, policy: WarpPolicy, budget: WaitBudget) -> GuidanceResult<()> {
        let f_cont = k.f_cont();
        let label = if body == k.config().target_body { "target SOI" } else { "departure SOI" };
        f_cont
            .warp_while(label, budget, || async {
                let orbit = f_cont.orbit().await?;
                Ok::<_, GuidanceError>(if orbit.is_around(body) {
                    WaitStep::Arrived
                } else {
                    WaitStep::Pending(policy.decide(orbit.time_to_soi_change.unwrap_or(f64::INFINITY)))
                })
            })
            .await?;
        log!("Entered the sphere of influence of {body}.");
        Ok(())
    }

    /// Waits for the target periapsis and fires the timed prograde return burn.
    async fn return_kick(k: &Keychain) -> GuidanceResult<()> {
        let cfg = &k.config().coast;
        let f_cont = k.f_cont();
        f_cont
            .warp_until("target periapsis", cfg.periapsis_warp, cfg.periapsis_budget, || async {
                Ok::<_, GuidanceError>(Some(f_cont.orbit().await?.time_to_periapsis))
            })
            .await?;
        if cfg.return_burn_secs <= 0.0 {
            log!("No return burn configured, coasting through periapsis.");
            return Ok(());
        }
        let burns = k.burns();
        let duration = Duration::from_secs_f64(cfg.return_burn_secs);
        k.director()
            .while_pointing(&Pointing::Prograde, || burns.burn_for(duration, cfg.return_burn_throttle))
            .await?;
        info!("Return burn complete.");
        Ok(())
    }
}

#[async_trait]
impl PhaseMode for CoastMode {
    fn type_name(&self) -> &'static str { Self::MODE_NAME }

    fn phase(&self) -> MissionPhase { MissionPhase::Coast }

    async fn init_mode(&self, k: Arc<Keychain>) -> GuidanceResult<()> {
        let cfg = k.config();
        let orbit = k.orbit().await?;
        if let (Some(soi), Some(periapsis)) = (orbit.time_to_soi_change, orbit.next_time_to_periapsis) {
            info!("Reaching {} in {soi:.0}s, periapsis there {periapsis:.0}s later.", cfg.target_body);
        }
        Self::coast_into(&k, &cfg.target_body, cfg.coast.soi_warp, cfg.coast.soi_budget).await?;
        if cfg.variant == MissionVariant::Capture {
            return Ok(());
        }
        Self::return_kick(&k).await?;
        Self::coast_into(&k, &cfg.departure_body, cfg.coast.soi_warp, cfg.coast.soi_budget).await
    }

    async fn exit_mode(&self, k: Arc<Keychain>) -> GuidanceResult<OpExitSignal> {
        let cfg = k.config();
        if cfg.variant == MissionVariant::Capture {
            return Ok(OpExitSignal::ReInit(Box::new(InsertionMode::new())));
        }
        let orbit = k.orbit().await?;
        info!(
            "Back around {}: apoapsis {:.1} km, periapsis {:.1} km.",
            orbit.body,
            orbit.apoapsis_altitude / 1000.0,
            orbit.periapsis_altitude / 1000.0
        );
        if orbit.periapsis_altitude < cfg.atmosphere_altitude {
            log!("Periapsis already inside the atmosphere, no correction needed.");
            Ok(OpExitSignal::ReInit(Box::new(ReentryMode::new())))
        } else {
            Ok(OpExitSignal::ReInit(Box::new(CorrectionMode::new())))
        }
    }
}
