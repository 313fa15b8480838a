use std::collections::VecDeque;

/// Inverse cosine that tolerates arguments pushed outside `[-1, 1]` by rounding or by
/// inconsistent samples.
///
/// # Arguments
/// - `arg`: The cosine value, possibly slightly out of range.
///
/// # Returns
/// - The angle in radians within `[0, π]`. `NaN` inputs map to `π / 2`.
pub fn clamped_acos(arg: f64) -> f64 {
    if arg.is_nan() {
        return std::f64::consts::FRAC_PI_2;
    }
    arg.clamp(-1.0, 1.0).acos()
}

/// Square root that floors negative radicands at zero.
///
/// # Arguments
/// - `value`: The radicand.
///
/// # Returns
/// - `sqrt(max(value, 0))`, or `0` for `NaN`.
pub fn clamped_sqrt(value: f64) -> f64 {
    if value.is_nan() || value <= 0.0 { 0.0 } else { value.sqrt() }
}

/// Trailing moving average over a fixed number of samples.
///
/// Used to keep single-sample jitter from the simulation tick out of rate estimates.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    samples: VecDeque<f64>,
    window: usize,
}

impl MovingAverage {
    /// Creates an empty average over the last `window` samples. A `window` of `0` is
    /// treated as `1`.
    pub fn new(window: usize) -> Self {
        let capacity = window.max(1);
        Self { samples: VecDeque::with_capacity(capacity), window: capacity }
    }

    /// Adds a sample, evicting the oldest one if the window is full, and returns the mean.
    #[allow(clippy::cast_precision_loss)]
    pub fn push(&mut self, sample: f64) -> f64 {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.mean().unwrap_or(sample)
    }

    /// Mean of the current window or `None` before the first sample.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
        }
    }

    pub fn len(&self) -> usize { self.samples.len() }

    pub fn is_empty(&self) -> bool { self.samples.is_empty() }
}
