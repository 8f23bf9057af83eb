//! Drive kinematics
//!
//! Mixing of forward/turn driver inputs into left/right drive powers.

mod differential_drive;

pub use differential_drive::DifferentialDrive;
