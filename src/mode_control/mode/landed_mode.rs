use super::PhaseMode;
use crate::error::GuidanceResult;
use crate::keychain::Keychain;
use crate::mode_control::{MissionOutcome, MissionPhase, OpExitSignal};
use async_trait::async_trait;
use std::sync::Arc;

/// Terminal phase: engine off, autopilot released and the vessel left on stability hold.
pub(crate) struct LandedMode {}

impl LandedMode {
    const MODE_NAME: &'static str = "LandedMode";

    pub(crate) fn new() -> Self { Self {} }
}

#[async_trait]
impl PhaseMode for LandedMode {
    fn type_name(&self) -> &'static str { Self::MODE_NAME }

    fn phase(&self) -> MissionPhase { MissionPhase::Landed }

    async fn init_mode(&self, k: Arc<Keychain>) -> GuidanceResult<()> {
        k.f_cont().cut_throttle().await?;
        k.director().hold().await
    }

    async fn exit_mode(&self, _: Arc<Keychain>) -> GuidanceResult<OpExitSignal> {
        Ok(OpExitSignal::Complete(MissionOutcome::Landed))
    }
}
