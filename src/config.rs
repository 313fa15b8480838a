//! Named tolerances, thresholds, warp factors and wait budgets for every mission phase.
//!
//! All durations are written in seconds. Every field is optional in a TOML file and
//! falls back to the flight-proven default.

use crate::flight_control::WarpPolicy;
use serde::Deserialize;
use std::{path::Path, time::Duration};
use strum_macros::Display;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config value for `{field}`: {value}")]
    Invalid { field: &'static str, value: f64 },
}

/// Seconds must convert into a [`Duration`]: finite, non-negative and in range.
fn check_secs(field: &'static str, value: f64) -> Result<(), ConfigError> {
    Duration::try_from_secs_f64(value).map(|_| ()).map_err(|_| ConfigError::Invalid { field, value })
}

/// A polling interval of zero would never advance a paused or warped clock.
fn check_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    check_secs(field, value)?;
    if value > 0.0 { Ok(()) } else { Err(ConfigError::Invalid { field, value }) }
}

/// Polling interval and the longest a wait loop may run before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WaitBudget {
    pub interval_secs: f64,
    pub max_wait_secs: f64,
}

impl WaitBudget {
    pub const fn new(interval_secs: f64, max_wait_secs: f64) -> Self {
        Self { interval_secs, max_wait_secs }
    }
    pub fn interval(&self) -> Duration { Duration::from_secs_f64(self.interval_secs) }
    pub fn max_wait(&self) -> Duration { Duration::from_secs_f64(self.max_wait_secs) }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        check_interval(field, self.interval_secs)?;
        check_secs(field, self.max_wait_secs)
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionVariant {
    /// Free return around the target body and landing back at the departure body.
    Flyby,
    /// Circular capture orbit at the target body's periapsis.
    Capture,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    pub variant: MissionVariant,
    pub departure_body: String,
    pub target_body: String,
    /// Periapsis altitudes below this guarantee atmospheric capture at the departure body.
    pub atmosphere_altitude: f64,
    pub ascent: AscentConfig,
    pub circularization: CircularizationConfig,
    pub transfer: TransferConfig,
    pub coast: CoastConfig,
    pub insertion: InsertionConfig,
    pub correction: CorrectionConfig,
    pub reentry: ReentryConfig,
    pub descent: DescentConfig,
    pub attitude: AttitudeConfig,
    pub staging: StagingConfig,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            variant: MissionVariant::Flyby,
            departure_body: String::from("Kerbin"),
            target_body: String::from("Mun"),
            atmosphere_altitude: 70_000.0,
            ascent: AscentConfig::default(),
            circularization: CircularizationConfig::default(),
            transfer: TransferConfig::default(),
            coast: CoastConfig::default(),
            insertion: InsertionConfig::default(),
            correction: CorrectionConfig::default(),
            reentry: ReentryConfig::default(),
            descent: DescentConfig::default(),
            attitude: AttitudeConfig::default(),
            staging: StagingConfig::default(),
        }
    }
}

impl GuidanceConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Rejects durations the wait loops cannot turn into a [`Duration`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let budgets = [
            ("ascent.poll", &self.ascent.poll),
            ("circularization.lead_budget", &self.circularization.lead_budget),
            ("circularization.burn_budget", &self.circularization.burn_budget),
            ("transfer.phase_budget", &self.transfer.phase_budget),
            ("transfer.burn_budget", &self.transfer.burn_budget),
            ("coast.soi_budget", &self.coast.soi_budget),
            ("coast.periapsis_budget", &self.coast.periapsis_budget),
            ("insertion.periapsis_budget", &self.insertion.periapsis_budget),
            ("insertion.burn_budget", &self.insertion.burn_budget),
            ("correction.apoapsis_budget", &self.correction.apoapsis_budget),
            ("correction.burn_budget", &self.correction.burn_budget),
            ("reentry.atmosphere_budget", &self.reentry.atmosphere_budget),
            ("reentry.window_budget", &self.reentry.window_budget),
            ("descent.touchdown_budget", &self.descent.touchdown_budget),
        ];
        for (field, budget) in budgets {
            budget.validate(field)?;
        }
        check_secs("coast.return_burn_secs", self.coast.return_burn_secs)?;
        check_secs("attitude.align_timeout_secs", self.attitude.align_timeout_secs)?;
        check_interval("staging.poll_interval_secs", self.staging.poll_interval_secs)
    }
}

/// Gravity turn up to the target apoapsis.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AscentConfig {
    pub target_apoapsis: f64,
    /// Engines cut this far below `target_apoapsis` to absorb burn lag.
    pub cutoff_margin: f64,
    /// Steepness of the pitch program; above 1 holds the vertical longer.
    pub profile_exponent: f64,
    pub launch_heading: f64,
    pub launch_throttle: f64,
    pub poll: WaitBudget,
}

impl Default for AscentConfig {
    fn default() -> Self {
        Self {
            target_apoapsis: 75_000.0,
            cutoff_margin: 500.0,
            profile_exponent: 1.25,
            launch_heading: 90.0,
            launch_throttle: 1.0,
            poll: WaitBudget::new(0.1, 900.0),
        }
    }
}

/// Thresholds and steps of the throttle correction applied to the smoothed
/// time-to-apoapsis rate.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RateCorrection {
    pub strong_negative: f64,
    pub mild_negative: f64,
    pub strong_positive: f64,
    pub mild_positive: f64,
    pub strong_step: f64,
    pub mild_step: f64,
}

impl Default for RateCorrection {
    fn default() -> Self {
        Self {
            strong_negative: -0.3,
            mild_negative: -0.1,
            strong_positive: 0.2,
            mild_positive: 0.0,
            strong_step: 0.03,
            mild_step: 0.01,
        }
    }
}

/// Feedback burn at apoapsis raising the periapsis out of the atmosphere.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CircularizationConfig {
    /// Waits until `inner_threshold` seconds before apoapsis.
    pub apoapsis_warp: WarpPolicy,
    pub lead_budget: WaitBudget,
    pub target_periapsis: f64,
    pub initial_throttle: f64,
    pub throttle_floor: f64,
    pub throttle_ceiling: f64,
    pub smoothing_window: usize,
    /// Simulation seconds below which a sample pair is not used for a rate estimate.
    pub min_sample_dt: f64,
    pub correction: RateCorrection,
    pub burn_budget: WaitBudget,
}

impl Default for CircularizationConfig {
    fn default() -> Self {
        Self {
            apoapsis_warp: WarpPolicy::new(22.0, 60.0, 4),
            lead_budget: WaitBudget::new(0.5, 1800.0),
            target_periapsis: 70_500.0,
            initial_throttle: 0.5,
            throttle_floor: 0.05,
            throttle_ceiling: 1.0,
            smoothing_window: 5,
            min_sample_dt: 0.001,
            correction: RateCorrection::default(),
            burn_budget: WaitBudget::new(0.5, 600.0),
        }
    }
}

/// Phase-angle wait and Hohmann departure burn towards the target body.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    pub phase_tolerance_deg: f64,
    /// Within this distance of the optimal angle the wait runs in real time.
    pub near_phase_band_deg: f64,
    pub converging_warp: u32,
    pub diverging_warp: u32,
    pub jettison_fairings: bool,
    pub throttle: f64,
    pub phase_budget: WaitBudget,
    pub burn_budget: WaitBudget,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            phase_tolerance_deg: 1.0,
            near_phase_band_deg: 20.0,
            converging_warp: 2,
            diverging_warp: 4,
            jettison_fairings: true,
            throttle: 1.0,
            phase_budget: WaitBudget::new(0.2, 7200.0),
            burn_budget: WaitBudget::new(0.15, 600.0),
        }
    }
}

/// Coasting between spheres of influence and the free-return kick at target periapsis.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoastConfig {
    pub soi_warp: WarpPolicy,
    pub soi_budget: WaitBudget,
    /// Waits until `inner_threshold` seconds before target periapsis.
    pub periapsis_warp: WarpPolicy,
    pub periapsis_budget: WaitBudget,
    /// Length of the burn at target periapsis that bends the flyby back home.
    /// `0` coasts through without a burn.
    pub return_burn_secs: f64,
    pub return_burn_throttle: f64,
}

impl Default for CoastConfig {
    fn default() -> Self {
        Self {
            soi_warp: WarpPolicy::new(0.0, 60.0, 5),
            soi_budget: WaitBudget::new(1.0, 21_600.0),
            periapsis_warp: WarpPolicy::new(10.0, 60.0, 5),
            periapsis_budget: WaitBudget::new(0.5, 7200.0),
            return_burn_secs: 15.0,
            return_burn_throttle: 1.0,
        }
    }
}

/// Capture into a circular orbit around the target body.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InsertionConfig {
    pub periapsis_warp: WarpPolicy,
    pub periapsis_budget: WaitBudget,
    pub throttle: f64,
    pub burn_budget: WaitBudget,
}

impl Default for InsertionConfig {
    fn default() -> Self {
        Self {
            periapsis_warp: WarpPolicy::new(2.0, 60.0, 5),
            periapsis_budget: WaitBudget::new(0.5, 7200.0),
            throttle: 1.0,
            burn_budget: WaitBudget::new(0.1, 600.0),
        }
    }
}

/// Braking burn at apoapsis lowering the periapsis into the atmosphere.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    pub target_periapsis: f64,
    pub apoapsis_warp: WarpPolicy,
    pub apoapsis_budget: WaitBudget,
    pub throttle: f64,
    pub burn_budget: WaitBudget,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            target_periapsis: 30_000.0,
            apoapsis_warp: WarpPolicy::new(30.0, 120.0, 4),
            apoapsis_budget: WaitBudget::new(0.5, 21_600.0),
            throttle: 0.5,
            burn_budget: WaitBudget::new(0.1, 600.0),
        }
    }
}

/// Coast down to the atmosphere and the heat-shield-first fall to the parachute window.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReentryConfig {
    /// Distance is time to periapsis; the wait ends on atmosphere entry instead.
    pub periapsis_warp: WarpPolicy,
    pub atmosphere_budget: WaitBudget,
    pub parachute_altitude: f64,
    pub parachute_speed: f64,
    pub window_budget: WaitBudget,
}

impl Default for ReentryConfig {
    fn default() -> Self {
        Self {
            periapsis_warp: WarpPolicy::new(-1.0, 60.0, 4),
            atmosphere_budget: WaitBudget::new(1.0, 21_600.0),
            parachute_altitude: 5000.0,
            parachute_speed: 250.0,
            window_budget: WaitBudget::new(0.5, 1800.0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DescentConfig {
    pub touchdown_altitude: f64,
    pub touchdown_budget: WaitBudget,
}

impl Default for DescentConfig {
    fn default() -> Self {
        Self { touchdown_altitude: 5.0, touchdown_budget: WaitBudget::new(1.0, 1800.0) }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AttitudeConfig {
    pub align_timeout_secs: f64,
}

impl Default for AttitudeConfig {
    fn default() -> Self { Self { align_timeout_secs: 120.0 } }
}

impl AttitudeConfig {
    pub fn align_timeout(&self) -> Duration { Duration::from_secs_f64(self.align_timeout_secs) }
}

/// Resources whose depletion in the active stage triggers a separation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    pub tracked_resources: Vec<String>,
    /// Amounts at or below this count as empty.
    pub depletion_threshold: f64,
    /// No separation is commanded once this stage is active.
    pub final_stage: i32,
    pub poll_interval_secs: f64,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            tracked_resources: vec![String::from("LiquidFuel"), String::from("SolidFuel")],
            depletion_threshold: 0.01,
            final_stage: 0,
            poll_interval_secs: 0.1,
        }
    }
}

impl StagingConfig {
    pub fn poll_interval(&self) -> Duration { Duration::from_secs_f64(self.poll_interval_secs) }
}
