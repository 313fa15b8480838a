mod ascent_mode;
mod coast_mode;
mod correction_mode;
mod descent_mode;
mod insertion_mode;
mod landed_mode;
mod phase_mode;
mod reentry_mode;
mod transfer_mode;

pub(crate) use ascent_mode::AscentMode;
pub(crate) use coast_mode::CoastMode;
pub(crate) use correction_mode::CorrectionMode;
pub use phase_mode::PhaseMode;
pub(crate) use reentry_mode::ReentryMode;
pub(crate) use transfer_mode::TransferMode;
