use super::PhaseMode;
use crate::error::{GuidanceError, GuidanceResult};
use crate::flight_control::orbit::ManeuverPlanner;
use crate::keychain::Keychain;
use crate::mode_control::{MissionOutcome, MissionPhase, OpExitSignal};
use crate::info;
use async_trait::async_trait;
use std::sync::Arc;

/// Capture into a circular orbit at the target body's periapsis.
pub(crate) struct InsertionMode {}

impl InsertionMode {
    const MODE_NAME: &'static str = "InsertionMode";

    pub(crate) fn new() -> Self { Self {} }
}

#[async_trait]
impl PhaseMode for InsertionMode {
    fn type_name(&self) -> &'static str { Self::MODE_NAME }

    fn phase(&self) -> MissionPhase { MissionPhase::Insertion }

    async fn init_mode(&self, k: Arc<Keychain>) -> GuidanceResult<()> {
        let cfg = &k.config().insertion;
        let f_cont = k.f_cont();
        f_cont
            .warp_until("capture periapsis", cfg.periapsis_warp, cfg.periapsis_budget, || async {
                Ok::<_, GuidanceError>(Some(f_cont.orbit().await?.time_to_periapsis))
            })
            .await?;

        let speed = f_cont.state().await?.orbital_speed;
        let plan = ManeuverPlanner::plan_circular_capture(&k.orbit().await?, speed)?;
        info!("Capture burn of {:.1} m/s at {speed:.1} m/s.", plan.required_delta_v());
        let burns = k.burns();
        k.director()
            .while_pointing(&plan.pointing(), || burns.burn_delta_v(&plan, cfg.throttle, cfg.burn_budget))
            .await?;

        let orbit = f_cont.orbit().await?;
        info!(
            "In orbit around {}: apoapsis {:.1} km, periapsis {:.1} km.",
            orbit.body,
            orbit.apoapsis_altitude / 1000.0,
            orbit.periapsis_altitude / 1000.0
        );
        Ok(())
    }

    async fn exit_mode(&self, _: Arc<Keychain>) -> GuidanceResult<OpExitSignal> {
        Ok(OpExitSignal::Complete(MissionOutcome::Captured))
    }
}
