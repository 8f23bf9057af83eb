//! Autonomous scripting
//!
//! Scripts are ordered lists of timed drives, encoder drives, waits and
//! shots. The [`AutonomousRunner`] steps through them from the control loop
//! tick without blocking.

mod runner;
mod script;
mod step;

pub use runner::{AutonomousRunner, RunnerStatus, StepOutcome};
pub use script::{AutoScript, MAX_STEPS};
pub use step::{Alliance, AutoStep, ShootBound};
