use super::mode::PhaseMode;
use strum_macros::Display;

/// Decision taken by a phase once its exit condition holds.
pub enum OpExitSignal {
    /// Continue the mission in the given phase.
    ReInit(Box<dyn PhaseMode>),
    /// The mission is over.
    Complete(MissionOutcome),
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum MissionOutcome {
    /// Back on the surface of the departure body.
    Landed,
    /// In a circular orbit around the target body.
    Captured,
}
