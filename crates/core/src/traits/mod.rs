//! Capability traits for the host robot runtime.
//!
//! The host supplies motor/servo drivers, input polling, telemetry and a
//! clock. Control logic depends only on these traits.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - `MockTime` is always available for deterministic tests
//! - Host implementations live outside this crate (see the sim crate)

pub mod actuator;
pub mod input;
pub mod telemetry;
pub mod time;

pub use actuator::{
    check_position, check_power, ActuatorError, Direction, EncoderActuator, GateServo,
    PowerActuator, RunMode, VelocityActuator,
};
pub use input::{Axis, Button, InputSource};
pub use telemetry::TelemetrySink;
pub use time::{ElapsedTimer, MockTime, TimeSource};
