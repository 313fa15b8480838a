//! Maneuver planning: pure orbital-mechanics computations that turn live orbital state
//! into burn plans and steering targets.

mod maneuver_plan;
mod maneuver_planner;
mod phase_angle;
mod pitch_program;

pub use maneuver_plan::{DeltaVMeasure, ManeuverPlan};
pub use maneuver_planner::{
    HohmannTransfer, ManeuverPlanner, apoapsis_braking_delta_v, circular_speed,
    transfer_delta_v, vis_viva_speed,
};
pub use phase_angle::{PhaseAngleTracker, PhaseObservation, law_of_cosines_argument, phase_angle_deg};
pub use pitch_program::PitchProgram;
