//! Autonomous guidance core for a launch, Mun flyby and return mission.
//!
//! The crate drives a simulated vessel through an externally supplied
//! [`VehicleInterface`](vehicle::VehicleInterface): the [`MissionSequencer`] flies one
//! phase after the other while a [`StageMonitor`] separates spent stages on its own task.
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]

pub mod config;
pub mod error;
pub mod flight_control;
pub mod keychain;
mod logger;
pub mod mode_control;
pub mod vehicle;

use crate::config::GuidanceConfig;
use crate::error::GuidanceResult;
use crate::flight_control::StageMonitor;
use crate::keychain::Keychain;
use crate::mode_control::{MissionReport, MissionSequencer, mode::AscentMode};
use crate::vehicle::VehicleInterface;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Flies the whole mission from the launch pad.
///
/// The stage monitor runs next to the sequencer for the entire mission and is stopped once
/// the sequencer returns, whether the mission succeeded or failed.
///
/// # Arguments
/// * `vehicle` – The link to the running simulation.
/// * `config` – The mission configuration.
///
/// # Errors
/// An unusable configuration before anything is commanded, otherwise the first error of
/// any phase; the mission is not resumed.
pub async fn run_mission(
    vehicle: Arc<dyn VehicleInterface>,
    config: GuidanceConfig,
) -> GuidanceResult<MissionReport> {
    config.validate()?;
    let k = Arc::new(Keychain::new(vehicle, config));
    let cancel = CancellationToken::new();
    let monitor = StageMonitor::new(k.f_cont(), &k.config().staging);
    let monitor_handle = tokio::spawn(monitor.run(cancel.clone()));
    info!("Starting {} mission to {}.", k.config().variant, k.config().target_body);

    let res = MissionSequencer::new(Arc::clone(&k)).run(Box::new(AscentMode::new())).await;
    cancel.cancel();
    let separations = monitor_handle.await.unwrap_or_else(|e| {
        error!("Stage monitor stopped abnormally: {e}");
        0
    });

    let mut report = res?;
    report.stage_separations = separations;
    info!(
        "Mission ended {} in phase {} with {} stage separations.",
        report.outcome, report.final_phase, report.stage_separations
    );
    Ok(report)
}
