//! Guidance building blocks shared by every mission phase: the command surface over the
//! vehicle, maneuver planning, burn execution, attitude requests, warped waits and the
//! staging watchdog.

mod attitude_director;
mod burn_executor;
pub(crate) mod common;
mod flight_computer;
pub(crate) mod orbit;
mod stage_monitor;
#[cfg(test)]
mod tests;
mod warp_scheduler;

pub use attitude_director::{AttitudeDirector, Pointing};
pub use burn_executor::{
    BurnExecutor, BurnReport, CircularizationReport, corrected_throttle, throttle_correction,
};
pub use flight_computer::FlightComputer;
pub use stage_monitor::{StageEvent, StageMonitor, StageWatch};
pub use warp_scheduler::{WaitStep, WarpDecision, WarpPolicy, WarpSession};
