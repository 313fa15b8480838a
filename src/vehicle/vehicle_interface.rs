use super::{
    AttitudeTarget, BodyState, OrbitalState, ReferenceFrame, SpaceObject, StageResources,
    VehicleState,
};
use async_trait::async_trait;
use nalgebra::Vector3;

/// Failures reported by the link to the running simulation.
#[derive(Debug, thiserror::Error)]
pub enum VehicleError {
    #[error("connection to the simulation was lost")]
    Disconnected,
    #[error("unknown celestial body `{0}`")]
    UnknownBody(String),
    #[error("command rejected: {0}")]
    Rejected(String),
}

/// The externally owned vehicle handle.
///
/// Both the mission sequencer and the stage monitor hold the same handle and may issue
/// commands concurrently. Every command is a single-field write that the simulation
/// applies atomically, so interleaving a throttle change with a stage separation is safe
/// and no lock is taken on this side.
#[async_trait]
pub trait VehicleInterface: Send + Sync {
    async fn read_orbit(&self) -> Result<OrbitalState, VehicleError>;
    async fn read_vehicle(&self) -> Result<VehicleState, VehicleError>;
    async fn read_body(&self, name: &str) -> Result<BodyState, VehicleError>;
    async fn read_stage_resources(&self) -> Result<StageResources, VehicleError>;
    /// Current simulation time in seconds.
    async fn universal_time(&self) -> Result<f64, VehicleError>;
    async fn position(
        &self,
        object: &SpaceObject,
        frame: &ReferenceFrame,
    ) -> Result<Vector3<f64>, VehicleError>;

    /// `throttle` is expected in `0.0..=1.0`.
    async fn set_throttle(&self, throttle: f64) -> Result<(), VehicleError>;
    /// `0` is real time.
    async fn set_warp_factor(&self, factor: u32) -> Result<(), VehicleError>;
    async fn command_stage_separation(&self) -> Result<(), VehicleError>;
    async fn set_panels_and_antennas(&self, deployed: bool) -> Result<(), VehicleError>;
    async fn deploy_parachutes(&self) -> Result<(), VehicleError>;
    async fn set_rcs(&self, enabled: bool) -> Result<(), VehicleError>;
    async fn jettison_fairings(&self) -> Result<(), VehicleError>;

    async fn engage(
        &self,
        frame: &ReferenceFrame,
        target: AttitudeTarget,
    ) -> Result<(), VehicleError>;
    /// Resolves once the autopilot reports the engaged target as reached.
    async fn wait_until_aligned(&self) -> Result<(), VehicleError>;
    async fn disengage(&self) -> Result<(), VehicleError>;
    async fn hold_stability(&self, enabled: bool) -> Result<(), VehicleError>;
}
