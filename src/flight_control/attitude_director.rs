use super::FlightComputer;
use crate::error::{GuidanceError, GuidanceResult};
use crate::log;
use crate::vehicle::{AttitudeTarget, ReferenceFrame};
use nalgebra::Vector3;
use std::{fmt, future::Future, time::Duration};

/// Orientations the mission asks the autopilot for.
#[derive(Debug, Clone, PartialEq)]
pub enum Pointing {
    Prograde,
    Retrograde,
    /// Heat shield first into the airflow.
    SurfaceRetrograde,
    /// Compass heading and pitch above the horizon in degrees.
    Fixed { heading: f64, pitch: f64 },
    Direction { frame: ReferenceFrame, vector: Vector3<f64> },
}

impl Pointing {
    pub fn frame_and_target(&self) -> (ReferenceFrame, AttitudeTarget) {
        match self {
            Pointing::Prograde => (ReferenceFrame::Orbital, AttitudeTarget::prograde()),
            Pointing::Retrograde => (ReferenceFrame::Orbital, AttitudeTarget::retrograde()),
            Pointing::SurfaceRetrograde => {
                (ReferenceFrame::SurfaceVelocity, AttitudeTarget::retrograde())
            }
            Pointing::Fixed { heading, pitch } => (
                ReferenceFrame::Surface,
                AttitudeTarget::HeadingPitch { heading: *heading, pitch: *pitch },
            ),
            Pointing::Direction { frame, vector } => {
                (frame.clone(), AttitudeTarget::Direction(vector.normalize()))
            }
        }
    }
}

impl fmt::Display for Pointing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pointing::Prograde => write!(f, "prograde"),
            Pointing::Retrograde => write!(f, "retrograde"),
            Pointing::SurfaceRetrograde => write!(f, "surface retrograde"),
            Pointing::Fixed { heading, pitch } => write!(f, "heading {heading:.1}°, pitch {pitch:.1}°"),
            Pointing::Direction { frame, vector } => {
                write!(f, "({:.2}, {:.2}, {:.2}) in {frame} frame", vector.x, vector.y, vector.z)
            }
        }
    }
}

/// Requests orientations from the external autopilot and waits for alignment.
pub struct AttitudeDirector<'a> {
    f_cont: &'a FlightComputer,
    align_timeout: Duration,
}

impl<'a> AttitudeDirector<'a> {
    pub fn new(f_cont: &'a FlightComputer, align_timeout: Duration) -> Self {
        Self { f_cont, align_timeout }
    }

    /// Engages the autopilot on `pointing` without waiting for alignment. Used to keep
    /// updating a target every control tick.
    pub async fn track(&self, pointing: &Pointing) -> GuidanceResult<()> {
        let (frame, target) = pointing.frame_and_target();
        Ok(self.f_cont.vehicle().engage(&frame, target).await?)
    }

    /// Engages the autopilot on `pointing` and blocks until it reports the target reached.
    ///
    /// # Errors
    /// * [`GuidanceError::ConvergenceTimeout`] if alignment takes longer than the
    ///   configured timeout.
    pub async fn point(&self, pointing: &Pointing) -> GuidanceResult<()> {
        log!("Pointing {pointing}.");
        self.track(pointing).await?;
        match tokio::time::timeout(self.align_timeout, self.f_cont.vehicle().wait_until_aligned()).await {
            Ok(res) => Ok(res?),
            Err(_) => Err(GuidanceError::ConvergenceTimeout {
                wait: "attitude alignment",
                budget: self.align_timeout,
            }),
        }
    }

    pub async fn release(&self) -> GuidanceResult<()> {
        Ok(self.f_cont.vehicle().disengage().await?)
    }

    /// Disengages pointing and leaves the vessel on stability hold.
    pub async fn hold(&self) -> GuidanceResult<()> {
        self.release().await?;
        Ok(self.f_cont.vehicle().hold_stability(true).await?)
    }

    /// Points at `pointing`, runs `maneuver` and releases the autopilot afterwards,
    /// whether the maneuver succeeded or not.
    pub async fn while_pointing<F, Fut, T>(&self, pointing: &Pointing, maneuver: F) -> GuidanceResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = GuidanceResult<T>>,
    {
        let res = match self.point(pointing).await {
            Ok(()) => maneuver().await,
            Err(e) => Err(e),
        };
        let released = self.release().await;
        let out = res?;
        released?;
        Ok(out)
    }
}
