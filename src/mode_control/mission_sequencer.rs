use super::{MissionOutcome, MissionPhase, OpExitSignal, mode::PhaseMode};
use crate::error::{GuidanceError, GuidanceResult};
use crate::keychain::Keychain;
use crate::{error, info};
use std::sync::Arc;

/// Summary of a finished mission.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionReport {
    /// Every phase entered, in order.
    pub phases: Vec<MissionPhase>,
    pub final_phase: MissionPhase,
    /// Separations commanded by the stage monitor over the whole mission.
    pub stage_separations: usize,
    pub outcome: MissionOutcome,
}

/// Drives the mission phase by phase. The only writer of the active [`MissionPhase`].
pub struct MissionSequencer {
    k: Arc<Keychain>,
    phase: Option<MissionPhase>,
    history: Vec<MissionPhase>,
}

impl MissionSequencer {
    pub fn new(k: Arc<Keychain>) -> Self { Self { k, phase: None, history: Vec::new() } }

    pub fn phase(&self) -> Option<MissionPhase> { self.phase }

    /// Makes `next` the active phase.
    ///
    /// # Errors
    /// * [`GuidanceError::IllegalTransition`] if `next` may not follow the active phase.
    ///   The first phase entered is unrestricted.
    fn enter(&mut self, next: MissionPhase) -> GuidanceResult<()> {
        if let Some(current) = self.phase {
            if !current.can_transition_to(next) {
                return Err(GuidanceError::IllegalTransition { from: current, to: next });
            }
        }
        self.phase = Some(next);
        self.history.push(next);
        Ok(())
    }

    /// Runs phases starting with `first` until one of them completes the mission.
    pub async fn run(mut self, first: Box<dyn PhaseMode>) -> GuidanceResult<MissionReport> {
        let mut mode = first;
        loop {
            self.enter(mode.phase())?;
            info!("Starting phase {} in {}.", mode.phase(), mode.type_name());
            if let Err(e) = mode.init_mode(Arc::clone(&self.k)).await {
                error!("Phase {} failed: {e}", mode.phase());
                return Err(e);
            }
            match mode.exit_mode(Arc::clone(&self.k)).await? {
                OpExitSignal::ReInit(next) => mode = next,
                OpExitSignal::Complete(outcome) => {
                    info!("Mission complete after {}: {outcome}.", mode.phase());
                    return Ok(MissionReport {
                        final_phase: mode.phase(),
                        phases: self.history,
                        stage_separations: 0,
                        outcome,
                    });
                }
            }
        }
    }
}
