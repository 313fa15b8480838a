//! Boundary to the running simulation: the vehicle link trait the guidance core drives,
//! the state snapshots it reads and the per-body constant cache.

mod body_registry;
#[cfg(test)]
pub(crate) mod mock_vehicle;
mod orbital_state;
mod reference_frame;
mod vehicle_interface;
mod vehicle_state;

pub use body_registry::{BodyConstants, BodyRegistry};
pub use orbital_state::{BodyOrbit, BodyState, OrbitalState};
pub use reference_frame::{AttitudeTarget, ReferenceFrame, SpaceObject};
pub use vehicle_interface::{VehicleError, VehicleInterface};
pub use vehicle_state::{ResourceLevel, StageResources, VehicleState};
