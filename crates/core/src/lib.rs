//! starterbot_core - Pure no_std control logic for the starter bot
//!
//! This crate contains the robot's platform-agnostic algorithms and types,
//! testable on host without any feature flags.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Hardware, input, telemetry and time injected via traits
//! - **Tick driven**: Nothing blocks; every wait is a timed state transition
//!
//! # Modules
//!
//! - [`traits`]: Capability traits (actuators, input, telemetry, time)
//! - [`hardware`]: Named-device resolution into a hardware bundle
//! - [`kinematics`]: Drive mixing
//! - [`shooter`]: Velocity-gated feeder and timed shot sequencer
//! - [`mode`]: Operating modes and the init-time selector
//! - [`autonomous`]: Autonomous scripts and their runner
//! - [`parameters`]: Parameter store and parameter blocks
//! - [`state`]: Commanded robot state record
//! - [`error`]: Configuration and control errors

#![no_std]

pub mod autonomous;
pub mod error;
pub mod hardware;
pub mod kinematics;
pub mod mode;
pub mod parameters;
pub mod shooter;
pub mod state;
pub mod traits;
