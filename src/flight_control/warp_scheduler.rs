use super::FlightComputer;
use crate::config::WaitBudget;
use crate::error::{GuidanceError, GuidanceResult};
use crate::event;
use serde::Deserialize;
use std::future::Future;
use tokio::time::Instant;

/// Warp factor requested for a single control tick.
///
/// It has no identity beyond the tick that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarpDecision {
    factor: u32,
}

impl WarpDecision {
    pub const REAL_TIME: WarpDecision = WarpDecision { factor: 0 };

    pub const fn accelerated(factor: u32) -> Self { Self { factor } }

    pub fn factor(self) -> u32 { self.factor }

    pub fn is_real_time(self) -> bool { self.factor == 0 }
}

/// Maps the distance to an upcoming event (seconds or degrees) to a warp factor.
///
/// Above `outer_threshold` the wait runs at `factor`; closer than that it runs in real
/// time. A distance at or below `inner_threshold` means the event has been reached.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WarpPolicy {
    pub inner_threshold: f64,
    pub outer_threshold: f64,
    pub factor: u32,
}

impl WarpPolicy {
    pub const fn new(inner_threshold: f64, outer_threshold: f64, factor: u32) -> Self {
        Self { inner_threshold, outer_threshold, factor }
    }

    pub fn has_arrived(&self, distance: f64) -> bool { distance <= self.inner_threshold }

    pub fn decide(&self, distance: f64) -> WarpDecision {
        if distance > self.outer_threshold {
            WarpDecision::accelerated(self.factor)
        } else {
            WarpDecision::REAL_TIME
        }
    }
}

/// Outcome of one poll inside a warped wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStep {
    Arrived,
    Pending(WarpDecision),
}

/// A wait period during which time warp may be requested.
///
/// Warp is only issued when the decision changes. [`WarpSession::release`] drops back to
/// real time and must run on every exit path before precision control resumes.
pub struct WarpSession<'a> {
    f_cont: &'a FlightComputer,
    label: &'static str,
    budget: WaitBudget,
    deadline: Instant,
    issued: Option<WarpDecision>,
}

impl<'a> WarpSession<'a> {
    pub fn acquire(f_cont: &'a FlightComputer, label: &'static str, budget: WaitBudget) -> Self {
        Self {
            f_cont,
            label,
            budget,
            deadline: Instant::now() + budget.max_wait(),
            issued: None,
        }
    }

    /// Applies `decision` and suspends for one polling interval.
    ///
    /// # Errors
    /// - [`GuidanceError::ConvergenceTimeout`] once the wait budget is spent.
    pub async fn tick(&mut self, decision: WarpDecision) -> GuidanceResult<()> {
        if Instant::now() >= self.deadline {
            return Err(GuidanceError::ConvergenceTimeout {
                wait: self.label,
                budget: self.budget.max_wait(),
            });
        }
        if self.issued != Some(decision) {
            event!("{}: warp factor {}", self.label, decision.factor());
            self.f_cont.set_warp(decision.factor()).await?;
            self.issued = Some(decision);
        }
        tokio::time::sleep(self.budget.interval()).await;
        Ok(())
    }

    pub async fn release(self) -> GuidanceResult<()> { self.f_cont.set_warp(0).await }
}

impl FlightComputer {
    /// Polls `poll` until it reports arrival, letting it pick the warp for each tick.
    /// Warp is reset to real time afterwards, whether the wait converged or failed.
    pub async fn warp_while<F, Fut>(
        &self,
        label: &'static str,
        budget: WaitBudget,
        mut poll: F,
    ) -> GuidanceResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GuidanceResult<WaitStep>>,
    {
        let mut session = WarpSession::acquire(self, label, budget);
        let res: GuidanceResult<()> = async {
            loop {
                match poll().await? {
                    WaitStep::Arrived => return Ok(()),
                    WaitStep::Pending(decision) => session.tick(decision).await?,
                }
            }
        }
        .await;
        let released = session.release().await;
        res.and(released)
    }

    /// Polls the distance reported by `poll` until `policy` considers the event reached.
    /// A `None` distance means the awaited condition already holds.
    pub async fn warp_until<F, Fut>(
        &self,
        label: &'static str,
        policy: WarpPolicy,
        budget: WaitBudget,
        mut poll: F,
    ) -> GuidanceResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GuidanceResult<Option<f64>>>,
    {
        self.warp_while(label, budget, || {
            let distance = poll();
            async move {
                Ok::<_, GuidanceError>(match distance.await? {
                    None => WaitStep::Arrived,
                    Some(d) if policy.has_arrived(d) => WaitStep::Arrived,
                    Some(d) => {
                        event!("{label}: {d:.1} to go");
                        WaitStep::Pending(policy.decide(d))
                    }
                })
            }
        })
        .await
    }
}
