use crate::config::ConfigError;
use crate::mode_control::MissionPhase;
use crate::vehicle::VehicleError;
use std::time::Duration;

/// Errors surfaced by the guidance core.
///
/// Numerical domain problems never show up here: acos and sqrt arguments are clamped
/// where they are computed.
#[derive(Debug, thiserror::Error)]
pub enum GuidanceError {
    #[error("`{wait}` did not converge within {budget:?}")]
    ConvergenceTimeout { wait: &'static str, budget: Duration },
    #[error("maneuver cannot be planned: {0}")]
    PlanningFailure(String),
    #[error("illegal phase transition {from} -> {to}")]
    IllegalTransition { from: MissionPhase, to: MissionPhase },
    #[error(transparent)]
    Vehicle(#[from] VehicleError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type GuidanceResult<T> = Result<T, GuidanceError>;
