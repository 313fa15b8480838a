use crate::config::GuidanceConfig;
use crate::error::GuidanceResult;
use crate::flight_control::{AttitudeDirector, BurnExecutor, FlightComputer};
use crate::vehicle::{BodyConstants, BodyRegistry, BodyState, OrbitalState, VehicleInterface};
use std::sync::Arc;

/// Struct bundling everything a mission phase needs: the flight computer over the shared
/// vehicle handle, the body registry and the mission configuration.
///
/// Handed to every phase explicitly, there is no process-wide connection or lookup table.
#[derive(Clone)]
pub struct Keychain {
    /// The flight computer issuing every command to the vessel.
    f_cont: Arc<FlightComputer>,
    /// Cached per-body gravitational constants.
    bodies: Arc<BodyRegistry>,
    /// Tolerances, thresholds and wait budgets for all phases.
    config: Arc<GuidanceConfig>,
}

impl Keychain {
    /// Creates a new `Keychain` around an externally owned vehicle handle.
    ///
    /// # Arguments
    /// - `vehicle`: The link to the running simulation.
    /// - `config`: The mission configuration.
    pub fn new(vehicle: Arc<dyn VehicleInterface>, config: GuidanceConfig) -> Self {
        Self {
            f_cont: Arc::new(FlightComputer::new(vehicle)),
            bodies: Arc::new(BodyRegistry::new()),
            config: Arc::new(config),
        }
    }

    /// Provides a cloned reference to the flight computer.
    pub fn f_cont(&self) -> Arc<FlightComputer> { Arc::clone(&self.f_cont) }

    pub fn config(&self) -> &GuidanceConfig { &self.config }

    /// An attitude director with the configured alignment timeout.
    pub fn director(&self) -> AttitudeDirector<'_> {
        AttitudeDirector::new(&self.f_cont, self.config.attitude.align_timeout())
    }

    pub fn burns(&self) -> BurnExecutor<'_> { BurnExecutor::new(&self.f_cont) }

    /// Constants of the named body, read from the simulation only on first use.
    pub async fn body_constants(&self, name: &str) -> GuidanceResult<BodyConstants> {
        Ok(self.bodies.constants(self.f_cont.vehicle(), name).await?)
    }

    pub async fn body(&self, name: &str) -> GuidanceResult<BodyState> {
        Ok(self.bodies.body(self.f_cont.vehicle(), name).await?)
    }

    /// A fresh orbit sample whose body constants come from the registry, so every plan
    /// against the same body uses the same `mu` and radius.
    pub async fn orbit(&self) -> GuidanceResult<OrbitalState> {
        let mut orbit = self.f_cont.orbit().await?;
        let constants = self.body_constants(&orbit.body).await?;
        orbit.gravitational_parameter = constants.gravitational_parameter;
        orbit.equatorial_radius = constants.equatorial_radius;
        Ok(orbit)
    }
}
