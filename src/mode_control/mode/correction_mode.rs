use super::{PhaseMode, reentry_mode::ReentryMode};
use crate::error::{GuidanceError, GuidanceResult};
use crate::flight_control::orbit::ManeuverPlanner;
use crate::keychain::Keychain;
use crate::mode_control::{MissionPhase, OpExitSignal};
use crate::{info, log};
use async_trait::async_trait;
use std::sync::Arc;

/// Braking burn at apoapsis that drops the periapsis deep enough into the atmosphere for
/// a guaranteed reentry.
pub(crate) struct CorrectionMode {}

impl CorrectionMode {
    const MODE_NAME: &'static str = "CorrectionMode";

    pub(crate) fn new() -> Self { Self {} }
}

#[async_trait]
impl PhaseMode for CorrectionMode {
    fn type_name(&self) -> &'static str { Self::MODE_NAME }

    fn phase(&self) -> MissionPhase { MissionPhase::Correction }

    async fn init_mode(&self, k: Arc<Keychain>) -> GuidanceResult<()> {
        let cfg = &k.config().correction;
        let f_cont = k.f_cont();
        log!("Periapsis too high, waiting for apoapsis to brake.");
        f_cont
            .warp_until("correction apoapsis", cfg.apoapsis_warp, cfg.apoapsis_budget, || async {
                Ok::<_, GuidanceError>(Some(f_cont.orbit().await?.time_to_apoapsis))
            })
            .await?;

        let plan = ManeuverPlanner::plan_periapsis_correction(&k.orbit().await?, cfg.target_periapsis)?;
        info!("Correction burn of {:.1} m/s.", plan.required_delta_v());
        let burns = k.burns();
        k.director()
            .while_pointing(&plan.pointing(), || burns.burn_delta_v(&plan, cfg.throttle, cfg.burn_budget))
            .await?;
        log!("New periapsis at {:.1} km.", f_cont.orbit().await?.periapsis_altitude / 1000.0);
        Ok(())
    }

    async fn exit_mode(&self, _: Arc<Keychain>) -> GuidanceResult<OpExitSignal> {
        Ok(OpExitSignal::ReInit(Box::new(ReentryMode::new())))
    }
}
