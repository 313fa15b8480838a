use super::{BodyState, VehicleError, VehicleInterface};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Gravitational constants of a celestial body. They never change during a mission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyConstants {
    pub gravitational_parameter: f64,
    pub equatorial_radius: f64,
}

/// Lookup of celestial bodies by name.
///
/// Constants are read from the simulation once per body and then served from the cache,
/// so repeated lookups cannot drift. Body orbits are always re-read.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    constants: RwLock<HashMap<String, BodyConstants>>,
}

impl BodyRegistry {
    pub fn new() -> Self { Self::default() }

    /// Returns the cached constants of `name`, reading them on first use.
    pub async fn constants(
        &self,
        vehicle: &dyn VehicleInterface,
        name: &str,
    ) -> Result<BodyConstants, VehicleError> {
        if let Some(c) = self.constants.read().await.get(name) {
            return Ok(*c);
        }
        let state = vehicle.read_body(name).await?;
        Ok(self.remember(&state).await)
    }

    /// Reads the full body state, replacing the reported constants with the cached ones.
    pub async fn body(
        &self,
        vehicle: &dyn VehicleInterface,
        name: &str,
    ) -> Result<BodyState, VehicleError> {
        let mut state = vehicle.read_body(name).await?;
        let constants = self.remember(&state).await;
        state.gravitational_parameter = constants.gravitational_parameter;
        state.equatorial_radius = constants.equatorial_radius;
        Ok(state)
    }

    async fn remember(&self, state: &BodyState) -> BodyConstants {
        let mut lock = self.constants.write().await;
        *lock.entry(state.name.clone()).or_insert(BodyConstants {
            gravitational_parameter: state.gravitational_parameter,
            equatorial_radius: state.equatorial_radius,
        })
    }
}
