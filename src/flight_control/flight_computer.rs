use crate::config::WaitBudget;
use crate::error::{GuidanceError, GuidanceResult};
use crate::vehicle::{
    OrbitalState, ReferenceFrame, SpaceObject, StageResources, VehicleInterface, VehicleState,
};
use crate::{event, info, log};
use nalgebra::Vector3;
use std::{future::Future, sync::Arc};
use tokio::time::Instant;

/// Command surface over the shared vehicle handle.
///
/// The flight computer holds no mutable state of its own. The mission sequencer and the
/// stage monitor each keep an `Arc` to the same instance and issue commands without any
/// lock; every command maps to a single-field write on the vehicle.
pub struct FlightComputer {
    /// The externally owned link to the simulated vessel.
    vehicle: Arc<dyn VehicleInterface>,
}

impl FlightComputer {
    pub fn new(vehicle: Arc<dyn VehicleInterface>) -> Self { Self { vehicle } }

    pub fn vehicle(&self) -> &dyn VehicleInterface { self.vehicle.as_ref() }

    pub async fn orbit(&self) -> GuidanceResult<OrbitalState> {
        Ok(self.vehicle.read_orbit().await?)
    }

    pub async fn state(&self) -> GuidanceResult<VehicleState> {
        Ok(self.vehicle.read_vehicle().await?)
    }

    pub async fn stage_resources(&self) -> GuidanceResult<StageResources> {
        Ok(self.vehicle.read_stage_resources().await?)
    }

    /// Current simulation time in seconds.
    pub async fn ut(&self) -> GuidanceResult<f64> { Ok(self.vehicle.universal_time().await?) }

    pub async fn position(
        &self,
        object: &SpaceObject,
        frame: &ReferenceFrame,
    ) -> GuidanceResult<Vector3<f64>> {
        Ok(self.vehicle.position(object, frame).await?)
    }

    /// Sets the throttle, clamped into `0.0..=1.0`.
    pub async fn set_throttle(&self, throttle: f64) -> GuidanceResult<()> {
        let clamped = throttle.clamp(0.0, 1.0);
        event!("Throttle set to {clamped:.2}");
        Ok(self.vehicle.set_throttle(clamped).await?)
    }

    pub async fn cut_throttle(&self) -> GuidanceResult<()> { self.set_throttle(0.0).await }

    /// Sets the global time-warp factor. Only the mission sequencer calls this.
    pub async fn set_warp(&self, factor: u32) -> GuidanceResult<()> {
        Ok(self.vehicle.set_warp_factor(factor).await?)
    }

    pub async fn separate_stage(&self) -> GuidanceResult<()> {
        Ok(self.vehicle.command_stage_separation().await?)
    }

    pub async fn set_panels_and_antennas(&self, deployed: bool) -> GuidanceResult<()> {
        log!("{} panels and antennas.", if deployed { "Deploying" } else { "Retracting" });
        Ok(self.vehicle.set_panels_and_antennas(deployed).await?)
    }

    pub async fn deploy_parachutes(&self) -> GuidanceResult<()> {
        info!("Deploying parachutes.");
        Ok(self.vehicle.deploy_parachutes().await?)
    }

    pub async fn set_rcs(&self, enabled: bool) -> GuidanceResult<()> {
        Ok(self.vehicle.set_rcs(enabled).await?)
    }

    pub async fn jettison_fairings(&self) -> GuidanceResult<()> {
        log!("Jettisoning fairings.");
        Ok(self.vehicle.jettison_fairings().await?)
    }

    /// Polls `condition` in real time until it holds.
    ///
    /// # Arguments
    /// * `label` – Name of the wait, used in logs and in the timeout error.
    /// * `budget` – Polling interval and maximum wait.
    /// * `condition` – Async check resolving to `true` once the wait is over.
    ///
    /// # Errors
    /// * [`GuidanceError::ConvergenceTimeout`] if `condition` stays false past the budget.
    pub async fn wait_until<F, Fut>(
        &self,
        label: &'static str,
        budget: WaitBudget,
        mut condition: F,
    ) -> GuidanceResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GuidanceResult<bool>>,
    {
        let deadline = Instant::now() + budget.max_wait();
        while !condition().await? {
            if Instant::now() >= deadline {
                return Err(GuidanceError::ConvergenceTimeout { wait: label, budget: budget.max_wait() });
            }
            tokio::time::sleep(budget.interval()).await;
        }
        Ok(())
    }
}
