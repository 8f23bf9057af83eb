#![cfg_attr(not(test), no_std)]

//! starterbot - Op modes for the starter bot
//!
//! Builds on `starterbot_core` to provide the programs the host robot
//! runtime executes: the init-time mode selection, the teleop drive handlers,
//! the built-in autonomous scripts and the tick-driven controller that owns
//! the hardware bundle.
//!
//! The host calls [`OpModeController::init_tick`] until the start signal,
//! then [`OpModeController::start`], then [`OpModeController::tick`] once per
//! loop iteration until stop.

pub mod logging;

pub mod config;
pub mod opmode;

pub use config::RobotConfig;
pub use opmode::{scripts, OpModeController, TickStatus};
