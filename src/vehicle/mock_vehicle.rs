use super::{
    AttitudeTarget, BodyOrbit, BodyState, OrbitalState, ReferenceFrame, ResourceLevel,
    SpaceObject, StageResources, VehicleError, VehicleInterface, VehicleState,
};
use async_trait::async_trait;
use nalgebra::Vector3;
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};
use tokio::time::Instant;

pub(crate) const KERBIN_MU: f64 = 3.5316e12;
pub(crate) const KERBIN_RADIUS: f64 = 600_000.0;
pub(crate) const MUN_MU: f64 = 6.513_839_8e10;
pub(crate) const MUN_RADIUS: f64 = 200_000.0;
pub(crate) const MUN_ORBIT_RADIUS: f64 = 12_000_000.0;

/// Every command the guidance core issued, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Throttle(f64),
    Warp(u32),
    Stage,
    PanelsAndAntennas(bool),
    Parachutes,
    Rcs(bool),
    Fairings,
    Engage(ReferenceFrame, AttitudeTarget),
    Disengage,
    Hold(bool),
}

/// Scriptable simulation state behind [`MockVehicle`].
#[derive(Debug, Clone)]
pub(crate) struct MockState {
    pub orbit: OrbitalState,
    pub vehicle: VehicleState,
    pub stage: StageResources,
    pub bodies: HashMap<String, BodyState>,
    pub vessel_position: Vector3<f64>,
    pub body_positions: HashMap<String, Vector3<f64>>,
    pub ut: f64,
    pub warp: u32,
    /// Autopilot never reports alignment.
    pub stuck_autopilot: bool,
    /// Remaining stage reads that fail with [`VehicleError::Disconnected`].
    pub failing_stage_reads: usize,
    /// Remaining separation commands the simulation rejects.
    pub failing_stage_commands: usize,
    pub body_reads: usize,
    pub commands: Vec<Command>,
}

type Dynamics = Box<dyn FnMut(&mut MockState, f64) + Send>;

struct Inner {
    state: MockState,
    dynamics: Option<Dynamics>,
    last_step: Instant,
}

/// In-memory vehicle for control-loop tests.
///
/// Simulation time follows the tokio clock, sped up by the current warp factor. On every
/// read the dynamics hook gets the state and the simulated seconds since the previous
/// read.
pub(crate) struct MockVehicle {
    inner: Mutex<Inner>,
}

impl MockVehicle {
    pub(crate) fn new(state: MockState) -> Self {
        Self { inner: Mutex::new(Inner { state, dynamics: None, last_step: Instant::now() }) }
    }

    /// A vessel in a 100 km circular parking orbit around Kerbin, with the Mun on its orbit.
    pub(crate) fn parked() -> Self { Self::new(MockState::parked()) }

    pub(crate) fn with_dynamics(self, dynamics: impl FnMut(&mut MockState, f64) + Send + 'static) -> Self {
        self.lock().dynamics = Some(Box::new(dynamics));
        self
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut MockState)) { f(&mut self.lock().state) }

    pub(crate) fn snapshot(&self) -> MockState { self.lock().state.clone() }

    pub(crate) fn commands(&self) -> Vec<Command> { self.lock().state.commands.clone() }

    pub(crate) fn warp_history(&self) -> Vec<u32> {
        self.commands()
            .into_iter()
            .filter_map(|c| if let Command::Warp(w) = c { Some(w) } else { None })
            .collect()
    }

    pub(crate) fn throttle_history(&self) -> Vec<f64> {
        self.commands()
            .into_iter()
            .filter_map(|c| if let Command::Throttle(t) = c { Some(t) } else { None })
            .collect()
    }

    pub(crate) fn separations(&self) -> usize {
        self.commands().iter().filter(|c| **c == Command::Stage).count()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn step(&self) -> MutexGuard<'_, Inner> {
        let mut guard = self.lock();
        let now = Instant::now();
        let Inner { state, dynamics, last_step } = &mut *guard;
        let dt = now.duration_since(*last_step).as_secs_f64() * f64::from(state.warp.max(1));
        *last_step = now;
        if dt > 0.0 {
            state.ut += dt;
            if let Some(dynamics) = dynamics {
                dynamics(state, dt);
            }
        }
        guard
    }

    fn record(&self, command: Command) {
        let mut guard = self.step();
        match &command {
            Command::Throttle(t) => guard.state.vehicle.throttle = *t,
            Command::Warp(w) => guard.state.warp = *w,
            _ => {}
        }
        guard.state.commands.push(command);
    }
}

impl MockState {
    pub(crate) fn parked() -> Self {
        let r = KERBIN_RADIUS + 100_000.0;
        let speed = (KERBIN_MU / r).sqrt();
        let mut bodies = HashMap::new();
        bodies.insert(
            String::from("Kerbin"),
            BodyState {
                name: String::from("Kerbin"),
                gravitational_parameter: KERBIN_MU,
                equatorial_radius: KERBIN_RADIUS,
                orbit: None,
            },
        );
        bodies.insert(
            String::from("Mun"),
            BodyState {
                name: String::from("Mun"),
                gravitational_parameter: MUN_MU,
                equatorial_radius: MUN_RADIUS,
                orbit: Some(BodyOrbit { semi_major_axis: MUN_ORBIT_RADIUS, radius: MUN_ORBIT_RADIUS }),
            },
        );
        Self {
            orbit: OrbitalState {
                body: String::from("Kerbin"),
                gravitational_parameter: KERBIN_MU,
                equatorial_radius: KERBIN_RADIUS,
                semi_major_axis: r,
                apoapsis_altitude: 100_000.0,
                periapsis_altitude: 100_000.0,
                time_to_apoapsis: 900.0,
                time_to_periapsis: 1800.0,
                radius: r,
                time_to_soi_change: None,
                next_time_to_periapsis: None,
            },
            vehicle: VehicleState {
                orbital_speed: speed,
                surface_speed: speed - 174.0,
                vertical_speed: 0.0,
                mean_altitude: 100_000.0,
                surface_altitude: 100_000.0,
                mass: 12_000.0,
                throttle: 0.0,
            },
            stage: StageResources {
                stage: 3,
                resources: vec![ResourceLevel {
                    name: String::from("LiquidFuel"),
                    amount: 360.0,
                    capacity: 360.0,
                }],
            },
            bodies,
            vessel_position: Vector3::new(r, 0.0, 0.0),
            body_positions: HashMap::from([(
                String::from("Mun"),
                Vector3::new(0.0, MUN_ORBIT_RADIUS, 0.0),
            )]),
            ut: 0.0,
            warp: 0,
            stuck_autopilot: false,
            failing_stage_reads: 0,
            failing_stage_commands: 0,
            body_reads: 0,
            commands: Vec::new(),
        }
    }
}

#[async_trait]
impl VehicleInterface for MockVehicle {
    async fn read_orbit(&self) -> Result<OrbitalState, VehicleError> {
        Ok(self.step().state.orbit.clone())
    }

    async fn read_vehicle(&self) -> Result<VehicleState, VehicleError> {
        Ok(self.step().state.vehicle.clone())
    }

    async fn read_body(&self, name: &str) -> Result<BodyState, VehicleError> {
        let mut guard = self.step();
        guard.state.body_reads += 1;
        guard.state.bodies.get(name).cloned().ok_or_else(|| VehicleError::UnknownBody(name.to_string()))
    }

    async fn read_stage_resources(&self) -> Result<StageResources, VehicleError> {
        let mut guard = self.step();
        if guard.state.failing_stage_reads > 0 {
            guard.state.failing_stage_reads -= 1;
            return Err(VehicleError::Disconnected);
        }
        Ok(guard.state.stage.clone())
    }

    async fn universal_time(&self) -> Result<f64, VehicleError> { Ok(self.step().state.ut) }

    async fn position(
        &self,
        object: &SpaceObject,
        _frame: &ReferenceFrame,
    ) -> Result<Vector3<f64>, VehicleError> {
        let guard = self.step();
        match object {
            SpaceObject::Vessel => Ok(guard.state.vessel_position),
            SpaceObject::Body(name) => guard
                .state
                .body_positions
                .get(name)
                .copied()
                .ok_or_else(|| VehicleError::UnknownBody(name.clone())),
        }
    }

    async fn set_throttle(&self, throttle: f64) -> Result<(), VehicleError> {
        self.record(Command::Throttle(throttle));
        Ok(())
    }

    async fn set_warp_factor(&self, factor: u32) -> Result<(), VehicleError> {
        self.record(Command::Warp(factor));
        Ok(())
    }

    async fn command_stage_separation(&self) -> Result<(), VehicleError> {
        {
            let mut guard = self.step();
            if guard.state.failing_stage_commands > 0 {
                guard.state.failing_stage_commands -= 1;
                return Err(VehicleError::Rejected(String::from("staging locked")));
            }
        }
        self.record(Command::Stage);
        Ok(())
    }

    async fn set_panels_and_antennas(&self, deployed: bool) -> Result<(), VehicleError> {
        self.record(Command::PanelsAndAntennas(deployed));
        Ok(())
    }

    async fn deploy_parachutes(&self) -> Result<(), VehicleError> {
        self.record(Command::Parachutes);
        Ok(())
    }

    async fn set_rcs(&self, enabled: bool) -> Result<(), VehicleError> {
        self.record(Command::Rcs(enabled));
        Ok(())
    }

    async fn jettison_fairings(&self) -> Result<(), VehicleError> {
        self.record(Command::Fairings);
        Ok(())
    }

    async fn engage(&self, frame: &ReferenceFrame, target: AttitudeTarget) -> Result<(), VehicleError> {
        self.record(Command::Engage(frame.clone(), target));
        Ok(())
    }

    async fn wait_until_aligned(&self) -> Result<(), VehicleError> {
        let stuck = self.step().state.stuck_autopilot;
        if stuck {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn disengage(&self) -> Result<(), VehicleError> {
        self.record(Command::Disengage);
        Ok(())
    }

    async fn hold_stability(&self, enabled: bool) -> Result<(), VehicleError> {
        self.record(Command::Hold(enabled));
        Ok(())
    }
}
