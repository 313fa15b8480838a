pub(crate) mod math;

pub use math::{MovingAverage, clamped_acos, clamped_sqrt};
