use super::FlightComputer;
use crate::config::StagingConfig;
use crate::vehicle::StageResources;
use crate::{error, info};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A separation request raised by [`StageWatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageEvent {
    /// The stage found depleted.
    pub depleted_stage: i32,
}

/// Edge detector for stage depletion.
///
/// A depleted stage keeps raising its event until the separation is confirmed; after that
/// the simulation reports the next stage, which has to run dry on its own before another
/// event is raised.
#[derive(Debug)]
pub struct StageWatch {
    tracked: Vec<String>,
    threshold: f64,
    final_stage: i32,
    separated_stage: Option<i32>,
}

impl StageWatch {
    pub fn new(cfg: &StagingConfig) -> Self {
        Self {
            tracked: cfg.tracked_resources.clone(),
            threshold: cfg.depletion_threshold,
            final_stage: cfg.final_stage,
            separated_stage: None,
        }
    }

    /// A stage counts as depleted when it carries at least one tracked resource and every
    /// tracked resource it carries is at or below the threshold.
    pub fn is_depleted(&self, stage: &StageResources) -> bool {
        let mut carried = self
            .tracked
            .iter()
            .filter_map(|name| stage.get(name))
            .filter(|res| res.capacity > 0.0)
            .peekable();
        if carried.peek().is_none() {
            return false;
        }
        carried.all(|res| res.amount <= self.threshold)
    }

    pub fn observe(&self, stage: &StageResources) -> Option<StageEvent> {
        if stage.stage <= self.final_stage || self.separated_stage == Some(stage.stage) {
            return None;
        }
        self.is_depleted(stage).then_some(StageEvent { depleted_stage: stage.stage })
    }

    /// Marks the stage of `event` as separated. Only call this once the separation command
    /// went through.
    pub fn confirm(&mut self, event: StageEvent) { self.separated_stage = Some(event.depleted_stage); }
}

/// Background watcher that separates spent stages for the whole mission.
///
/// Runs next to the mission sequencer on the shared [`FlightComputer`]; a separation is a
/// single command and needs no coordination with the running phase.
pub struct StageMonitor {
    f_cont: Arc<FlightComputer>,
    watch: StageWatch,
    poll_interval: std::time::Duration,
}

impl StageMonitor {
    pub fn new(f_cont: Arc<FlightComputer>, cfg: &StagingConfig) -> Self {
        Self { f_cont, watch: StageWatch::new(cfg), poll_interval: cfg.poll_interval() }
    }

    /// Polls the active stage until `cancel` fires. Returns the number of separations
    /// commanded.
    ///
    /// Read and command failures are logged and retried on the next tick.
    pub async fn run(mut self, cancel: CancellationToken) -> usize {
        let mut separations = 0;
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.poll_interval) => {}
            }
            let stage = match self.f_cont.stage_resources().await {
                Ok(stage) => stage,
                Err(e) => {
                    error!("Stage monitor failed to read resources: {e}");
                    continue;
                }
            };
            if let Some(ev) = self.watch.observe(&stage) {
                info!("Stage {} depleted, separating.", ev.depleted_stage);
                match self.f_cont.separate_stage().await {
                    Ok(()) => {
                        self.watch.confirm(ev);
                        separations += 1;
                    }
                    Err(e) => error!("Stage separation failed, retrying: {e}"),
                }
            }
        }
        separations
    }
}
