//! Mission phase state machine: one mode per phase, chained by the sequencer through the
//! exit signals each mode returns.

mod mission_phase;
mod mission_sequencer;
pub(crate) mod mode;
mod signal;

pub use mission_phase::MissionPhase;
pub use mission_sequencer::{MissionReport, MissionSequencer};
pub use mode::PhaseMode;
pub use signal::{MissionOutcome, OpExitSignal};
