//! starterbot_sim - Host simulation for the starter bot op modes
//!
//! Simulated motors, servo, driver input, telemetry and clock implementing
//! the `starterbot_core` capability traits, plus a [`Simulation`] runner
//! that drives an [`OpModeController`](starterbot::OpModeController) through
//! init, start and the active loop.

pub mod clock;
pub mod error;
pub mod hardware_map;
pub mod input;
pub mod log_capture;
pub mod motor;
pub mod servo;
pub mod simulation;
pub mod telemetry;

pub use clock::SimClock;
pub use error::SimError;
pub use hardware_map::SimHardwareMap;
pub use input::SimInput;
pub use log_capture::{CapturedRecord, LogCapture};
pub use motor::{MotorConfig, SimMotor};
pub use servo::SimServo;
pub use simulation::{SimController, Simulation, DEFAULT_TICK_MS};
pub use telemetry::{Entry, TelemetryRecorder};
