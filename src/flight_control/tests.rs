use super::*;
use crate::config::{CircularizationConfig, RateCorrection, StagingConfig, WaitBudget};
use crate::error::GuidanceError;
use crate::flight_control::orbit::{DeltaVMeasure, ManeuverPlan};
use crate::vehicle::mock_vehicle::{Command, MockVehicle};
use crate::vehicle::{ResourceLevel, StageResources};
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

fn computer(mock: &Arc<MockVehicle>) -> FlightComputer { FlightComputer::new(Arc::clone(mock) as _) }

fn fuel_stage(stage: i32, liquid: f64) -> StageResources {
    StageResources {
        stage,
        resources: vec![
            ResourceLevel { name: String::from("LiquidFuel"), amount: liquid, capacity: 360.0 },
            ResourceLevel { name: String::from("Oxidizer"), amount: liquid * 1.2, capacity: 440.0 },
        ],
    }
}

#[test]
fn test_warp_policy_thresholds() {
    let policy = WarpPolicy::new(30.0, 120.0, 4);
    assert_eq!(policy.decide(200.0).factor(), 4);
    assert!(policy.decide(10.0).is_real_time());
    assert!(policy.decide(120.0).is_real_time());
    assert!(policy.has_arrived(10.0));
    assert!(!policy.has_arrived(30.5));
}

#[tokio::test(start_paused = true)]
async fn test_warp_until_releases_after_arrival() {
    let mock = Arc::new(MockVehicle::parked().with_dynamics(|s, dt| s.orbit.time_to_apoapsis -= dt));
    mock.update(|s| s.orbit.time_to_apoapsis = 300.0);
    let f_cont = computer(&mock);
    let res = f_cont
        .warp_until("apoapsis", WarpPolicy::new(22.0, 60.0, 4), WaitBudget::new(0.5, 1800.0), || async {
            Ok::<_, GuidanceError>(Some(f_cont.orbit().await?.time_to_apoapsis))
        })
        .await;
    assert!(res.is_ok());
    // Only changes are issued, the trailing zero is the release.
    assert_eq!(mock.warp_history(), vec![4, 0, 0]);
    let left = mock.snapshot().orbit.time_to_apoapsis;
    assert!(left <= 22.0 && left > 0.0, "stopped at {left}");
}

#[tokio::test(start_paused = true)]
async fn test_warp_until_releases_on_timeout() {
    let mock = Arc::new(MockVehicle::parked());
    mock.update(|s| s.orbit.time_to_apoapsis = 300.0);
    let f_cont = computer(&mock);
    let res = f_cont
        .warp_until("apoapsis", WarpPolicy::new(22.0, 60.0, 4), WaitBudget::new(1.0, 10.0), || async {
            Ok::<_, GuidanceError>(Some(f_cont.orbit().await?.time_to_apoapsis))
        })
        .await;
    assert!(matches!(res, Err(GuidanceError::ConvergenceTimeout { wait: "apoapsis", .. })));
    assert_eq!(mock.warp_history().last(), Some(&0));
}

#[tokio::test(start_paused = true)]
async fn test_warp_until_none_means_arrived() {
    let mock = Arc::new(MockVehicle::parked());
    let f_cont = computer(&mock);
    f_cont
        .warp_until("soi", WarpPolicy::new(0.0, 60.0, 5), WaitBudget::new(1.0, 10.0), || async {
            Ok(None)
        })
        .await
        .unwrap();
    assert_eq!(mock.warp_history(), vec![0]);
}

#[test]
fn test_throttle_correction_bands() {
    let c = RateCorrection::default();
    assert!((throttle_correction(-0.5, &c) - 0.03).abs() < f64::EPSILON);
    assert!((throttle_correction(-0.2, &c) - 0.01).abs() < f64::EPSILON);
    assert!((throttle_correction(0.5, &c) + 0.03).abs() < f64::EPSILON);
    assert!((throttle_correction(0.1, &c) + 0.01).abs() < f64::EPSILON);
    assert!(throttle_correction(-0.1, &c).abs() < f64::EPSILON);
    assert!(throttle_correction(0.0, &c).abs() < f64::EPSILON);
}

#[test]
fn test_dead_band_leaves_throttle_unchanged() {
    let c = RateCorrection::default();
    for rate in [-0.1, -0.05, 0.0] {
        // Even a value outside the clamp range is left alone.
        assert!((corrected_throttle(0.42, rate, &c, 0.05, 1.0) - 0.42).abs() < f64::EPSILON);
        assert!((corrected_throttle(0.01, rate, &c, 0.05, 1.0) - 0.01).abs() < f64::EPSILON);
    }
}

#[test]
fn test_corrected_throttle_is_clamped() {
    let c = RateCorrection::default();
    assert!((corrected_throttle(0.99, -1.0, &c, 0.05, 1.0) - 1.0).abs() < f64::EPSILON);
    assert!((corrected_throttle(0.06, 1.0, &c, 0.05, 1.0) - 0.05).abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn test_burn_delta_v_stops_at_plan() {
    let mock = Arc::new(
        MockVehicle::parked().with_dynamics(|s, dt| s.vehicle.orbital_speed -= s.vehicle.throttle * 10.0 * dt),
    );
    let f_cont = computer(&mock);
    let plan = ManeuverPlan::braking(100.0, DeltaVMeasure::SpeedChange);
    let report = BurnExecutor::new(&f_cont)
        .burn_delta_v(&plan, 0.5, WaitBudget::new(0.1, 600.0))
        .await
        .unwrap();
    assert!(report.achieved >= 100.0);
    assert!(report.achieved < 101.0, "overshot to {}", report.achieved);
    assert_eq!(mock.throttle_history(), vec![0.5, 0.0]);
}

#[tokio::test(start_paused = true)]
async fn test_burn_delta_v_vis_viva_measure() {
    let mock = Arc::new(
        MockVehicle::parked().with_dynamics(|s, dt| s.orbit.semi_major_axis += s.vehicle.throttle * 20_000.0 * dt),
    );
    let f_cont = computer(&mock);
    let plan = ManeuverPlan::along_velocity(50.0, DeltaVMeasure::VisVivaSpeed);
    let report = BurnExecutor::new(&f_cont)
        .burn_delta_v(&plan, 1.0, WaitBudget::new(0.15, 600.0))
        .await
        .unwrap();
    assert!(report.achieved >= 50.0);
    assert!(report.samples > 1);
}

#[tokio::test(start_paused = true)]
async fn test_burn_timeout_cuts_throttle() {
    let mock = Arc::new(MockVehicle::parked());
    let f_cont = computer(&mock);
    let plan = ManeuverPlan::along_velocity(100.0, DeltaVMeasure::SpeedChange);
    let res = BurnExecutor::new(&f_cont).burn_delta_v(&plan, 1.0, WaitBudget::new(0.1, 5.0)).await;
    assert!(matches!(res, Err(GuidanceError::ConvergenceTimeout { .. })));
    assert_eq!(mock.throttle_history().last(), Some(&0.0));
}

#[tokio::test(start_paused = true)]
async fn test_zero_delta_v_does_not_fire() {
    let mock = Arc::new(MockVehicle::parked());
    let f_cont = computer(&mock);
    let plan = ManeuverPlan::along_velocity(0.0, DeltaVMeasure::SpeedChange);
    let report = BurnExecutor::new(&f_cont).burn_delta_v(&plan, 1.0, WaitBudget::new(0.1, 5.0)).await.unwrap();
    assert_eq!(report.samples, 0);
    assert!(mock.throttle_history().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_timed_burn() {
    let mock = Arc::new(MockVehicle::parked());
    let f_cont = computer(&mock);
    let start = tokio::time::Instant::now();
    BurnExecutor::new(&f_cont).burn_for(Duration::from_secs(15), 1.0).await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(15));
    assert_eq!(mock.throttle_history(), vec![1.0, 0.0]);
}

#[tokio::test(start_paused = true)]
async fn test_circularization_feedback() {
    let mock = Arc::new(MockVehicle::parked().with_dynamics(|s, dt| {
        s.orbit.periapsis_altitude += s.vehicle.throttle * 400.0 * dt;
        s.orbit.time_to_apoapsis -= dt;
    }));
    mock.update(|s| {
        s.orbit.periapsis_altitude = -50_000.0;
        s.orbit.time_to_apoapsis = 22.0;
    });
    let f_cont = computer(&mock);
    let cfg = CircularizationConfig::default();
    let report = BurnExecutor::new(&f_cont).circularize(&cfg).await.unwrap();
    assert!(report.periapsis_altitude >= cfg.target_periapsis);
    assert!(report.corrections > 0);
    assert_eq!(report.skipped_samples, 0);
    let history = mock.throttle_history();
    assert_eq!(history.first(), Some(&0.5));
    assert_eq!(history.last(), Some(&0.0));
    // Apoapsis slipping away only ever pushes the throttle up.
    let burning = &history[..history.len() - 1];
    assert!(burning.windows(2).all(|w| w[1] >= w[0] && w[1] <= 1.0));
}

#[tokio::test(start_paused = true)]
async fn test_circularization_skips_stalled_clock() {
    let mut stalled = 0;
    let mock = Arc::new(MockVehicle::parked().with_dynamics(move |s, dt| {
        if stalled < 5 {
            stalled += 1;
            s.ut -= dt;
        }
        s.orbit.periapsis_altitude += s.vehicle.throttle * 400.0 * dt;
    }));
    mock.update(|s| s.orbit.periapsis_altitude = 50_000.0);
    let f_cont = computer(&mock);
    let report = BurnExecutor::new(&f_cont).circularize(&CircularizationConfig::default()).await.unwrap();
    assert_eq!(report.skipped_samples, 5);
    assert_eq!(mock.throttle_history().last(), Some(&0.0));
}

#[test]
fn test_stage_watch_fires_once_per_depletion() {
    let mut watch = StageWatch::new(&StagingConfig::default());
    let mut events = Vec::new();
    for fuel in [120.0, 40.0, 0.5, 0.0, 0.0, 0.0] {
        if let Some(ev) = watch.observe(&fuel_stage(3, fuel)) {
            watch.confirm(ev);
            events.push(ev);
        }
    }
    assert_eq!(events, vec![StageEvent { depleted_stage: 3 }]);

    // The next stage has to run dry on its own.
    assert!(watch.observe(&fuel_stage(2, 360.0)).is_none());
    assert_eq!(watch.observe(&fuel_stage(2, 0.0)), Some(StageEvent { depleted_stage: 2 }));
}

#[test]
fn test_stage_watch_repeats_until_confirmed() {
    let mut watch = StageWatch::new(&StagingConfig::default());
    let empty = fuel_stage(3, 0.0);
    assert_eq!(watch.observe(&empty), Some(StageEvent { depleted_stage: 3 }));
    assert_eq!(watch.observe(&empty), Some(StageEvent { depleted_stage: 3 }));
    watch.confirm(StageEvent { depleted_stage: 3 });
    assert!(watch.observe(&empty).is_none());
}

#[test]
fn test_stage_watch_ignores_final_and_untracked_stages() {
    let watch = StageWatch::new(&StagingConfig::default());
    assert!(watch.observe(&fuel_stage(0, 0.0)).is_none());
    let parachute_stage = StageResources {
        stage: 1,
        resources: vec![ResourceLevel { name: String::from("ElectricCharge"), amount: 0.0, capacity: 50.0 }],
    };
    assert!(watch.observe(&parachute_stage).is_none());
    assert!(watch.observe(&StageResources { stage: 1, resources: Vec::new() }).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_stage_monitor_single_separation() {
    let mock = Arc::new(MockVehicle::parked().with_dynamics(|s, dt| {
        for res in &mut s.stage.resources {
            res.amount = (res.amount - 40.0 * dt).max(0.0);
        }
    }));
    mock.update(|s| s.failing_stage_reads = 3);
    let f_cont = Arc::new(computer(&mock));
    let cancel = CancellationToken::new();
    let monitor = StageMonitor::new(Arc::clone(&f_cont), &StagingConfig::default());
    let handle = tokio::spawn(monitor.run(cancel.clone()));
    tokio::time::sleep(Duration::from_secs(60)).await;
    cancel.cancel();
    assert_eq!(handle.await.unwrap(), 1);
    assert_eq!(mock.separations(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_separation_is_retried() {
    let mock = Arc::new(MockVehicle::parked());
    mock.update(|s| {
        s.stage = fuel_stage(3, 0.0);
        s.failing_stage_commands = 1;
    });
    let f_cont = Arc::new(computer(&mock));
    let cancel = CancellationToken::new();
    let monitor = StageMonitor::new(Arc::clone(&f_cont), &StagingConfig::default());
    let handle = tokio::spawn(monitor.run(cancel.clone()));
    tokio::time::sleep(Duration::from_secs(30)).await;
    cancel.cancel();
    assert_eq!(handle.await.unwrap(), 1);
    assert_eq!(mock.separations(), 1);
    assert_eq!(mock.snapshot().failing_stage_commands, 0);
}

#[tokio::test(start_paused = true)]
async fn test_attitude_timeout_still_releases() {
    let mock = Arc::new(MockVehicle::parked());
    mock.update(|s| s.stuck_autopilot = true);
    let f_cont = computer(&mock);
    let director = AttitudeDirector::new(&f_cont, Duration::from_secs(30));
    let res = director.while_pointing(&Pointing::Retrograde, || async { Ok(()) }).await;
    assert!(matches!(res, Err(GuidanceError::ConvergenceTimeout { wait: "attitude alignment", .. })));
    assert_eq!(mock.commands().last(), Some(&Command::Disengage));
}

#[tokio::test(start_paused = true)]
async fn test_while_pointing_releases_after_maneuver() {
    let mock = Arc::new(MockVehicle::parked());
    let f_cont = computer(&mock);
    let director = AttitudeDirector::new(&f_cont, Duration::from_secs(30));
    let out = director
        .while_pointing(&Pointing::Prograde, || async { f_cont.set_throttle(1.0).await.map(|()| 7) })
        .await
        .unwrap();
    assert_eq!(out, 7);
    let commands = mock.commands();
    assert!(matches!(commands[0], Command::Engage(crate::vehicle::ReferenceFrame::Orbital, _)));
    assert_eq!(commands[1], Command::Throttle(1.0));
    assert_eq!(commands[2], Command::Disengage);
}

#[tokio::test(start_paused = true)]
async fn test_hold_disengages_then_holds() {
    let mock = Arc::new(MockVehicle::parked());
    let f_cont = computer(&mock);
    AttitudeDirector::new(&f_cont, Duration::from_secs(30)).hold().await.unwrap();
    assert_eq!(mock.commands(), vec![Command::Disengage, Command::Hold(true)]);
}
