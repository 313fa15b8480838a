use super::{PhaseMode, landed_mode::LandedMode};
use crate::error::{GuidanceError, GuidanceResult};
use crate::keychain::Keychain;
use crate::mode_control::{MissionPhase, OpExitSignal};
use crate::{info, log};
use async_trait::async_trait;
use std::sync::Arc;

/// Parachute descent down to surface contact.
pub(crate) struct DescentMode {}

impl DescentMode {
    const MODE_NAME: &'static str = "DescentMode";

    pub(crate) fn new() -> Self { Self {} }
}

#[async_trait]
impl PhaseMode for DescentMode {
    fn type_name(&self) -> &'static str { Self::MODE_NAME }

    fn phase(&self) -> MissionPhase { MissionPhase::Descent }

    async fn init_mode(&self, k: Arc<Keychain>) -> GuidanceResult<()> {
        let cfg = &k.config().descent;
        let f_cont = k.f_cont();
        let state = f_cont.state().await?;
        log!("Altitude {:.0} m, speed {:.0} m/s.", state.mean_altitude, state.surface_speed);
        f_cont.deploy_parachutes().await?;
        f_cont
            .wait_until("touchdown", cfg.touchdown_budget, || async {
                Ok::<_, GuidanceError>(f_cont.state().await?.surface_altitude <= cfg.touchdown_altitude)
            })
            .await?;
        info!("Touchdown.");
        Ok(())
    }

    async fn exit_mode(&self, _: Arc<Keychain>) -> GuidanceResult<OpExitSignal> {
        Ok(OpExitSignal::ReInit(Box::new(LandedMode::new())))
    }
}
