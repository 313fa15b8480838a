use super::{PhaseMode, descent_mode::DescentMode};
use crate::error::{GuidanceError, GuidanceResult};
use crate::flight_control::{Pointing, WaitStep};
use crate::keychain::Keychain;
use crate::mode_control::{MissionPhase, OpExitSignal};
use crate::{event, info, log};
use async_trait::async_trait;
use std::sync::Arc;

/// Falls into the atmosphere heat shield first and waits for the parachute window.
///
/// The autopilot stays engaged on surface retrograde when this phase ends; it is only
/// released once the vessel is down.
pub(crate) struct ReentryMode {}

impl ReentryMode {
    const MODE_NAME: &'static str = "ReentryMode";

    pub(crate) fn new() -> Self { Self {} }
}

#[async_trait]
impl PhaseMode for ReentryMode {
    fn type_name(&self) -> &'static str { Self::MODE_NAME }

    fn phase(&self) -> MissionPhase { MissionPhase::Reentry }

    async fn init_mode(&self, k: Arc<Keychain>) -> GuidanceResult<()> {
        let cfg = &k.config().reentry;
        let atmosphere = k.config().atmosphere_altitude;
        let f_cont = k.f_cont();
        log!("Waiting for atmosphere entry.");
        f_cont
            .warp_while("atmosphere entry", cfg.atmosphere_budget, || async {
                let altitude = f_cont.state().await?.mean_altitude;
                if altitude <= atmosphere {
                    return Ok(WaitStep::Arrived);
                }
                let time_to_periapsis = f_cont.orbit().await?.time_to_periapsis;
                Ok::<_, GuidanceError>(WaitStep::Pending(cfg.periapsis_warp.decide(time_to_periapsis)))
            })
            .await?;
        info!("Atmosphere entry, turning heat shield into the airflow.");

        k.director().point(&Pointing::SurfaceRetrograde).await?;
        f_cont.set_panels_and_antennas(false).await?;

        f_cont
            .wait_until("parachute window", cfg.window_budget, || async {
                let state = f_cont.state().await?;
                event!("Altitude {:.0} m, speed {:.0} m/s", state.mean_altitude, state.surface_speed);
                Ok::<_, GuidanceError>(
                    state.mean_altitude < cfg.parachute_altitude && state.surface_speed < cfg.parachute_speed,
                )
            })
            .await?;
        Ok(())
    }

    async fn exit_mode(&self, _: Arc<Keychain>) -> GuidanceResult<OpExitSignal> {
        Ok(OpExitSignal::ReInit(Box::new(DescentMode::new())))
    }
}
