use crate::error::GuidanceResult;
use crate::keychain::Keychain;
use crate::mode_control::{MissionPhase, OpExitSignal};
use async_trait::async_trait;
use std::sync::Arc;

/// A single mission phase in the nested state machine.
///
/// The sequencer first calls [`PhaseMode::init_mode`], which flies the phase until its
/// exit condition has been observed, and then [`PhaseMode::exit_mode`] to pick what comes
/// next. Both run strictly in sequence; a phase never starts before the previous one has
/// returned.
#[async_trait]
pub trait PhaseMode: Send + Sync {
    /// Name of the mode, used for logging.
    fn type_name(&self) -> &'static str;

    fn phase(&self) -> MissionPhase;

    /// Flies the phase. Returns once the exit condition holds.
    ///
    /// # Errors
    /// Any failure of the underlying waits, burns or vehicle commands. Warp and throttle
    /// are already back at zero when an error surfaces.
    async fn init_mode(&self, k: Arc<Keychain>) -> GuidanceResult<()>;

    /// Chooses the successor of this phase.
    async fn exit_mode(&self, k: Arc<Keychain>) -> GuidanceResult<OpExitSignal>;
}
