//! Actuator capability traits
//!
//! The host runtime owns the motor and servo drivers. Control logic only sees
//! the capabilities it needs, decided at wiring time:
//!
//! - [`PowerActuator`]: open-loop power (feeder, agitator)
//! - [`VelocityActuator`]: closed-loop velocity (flywheel)
//! - [`EncoderActuator`]: encoder feedback and run-to-position (drive motors)
//! - [`GateServo`]: positional servo (gate/stopper)
//!
//! A flywheel is never obtained by downcasting a plain motor handle; the
//! hardware map hands out a `VelocityActuator` directly.

use core::fmt;

/// Actuator command errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// Power value outside [-1.0, +1.0]
    InvalidPower,
    /// Servo position outside [0.0, 1.0]
    InvalidPosition,
    /// Driver reported a hardware fault
    HardwareFault,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActuatorError::InvalidPower => write!(f, "power outside [-1.0, 1.0]"),
            ActuatorError::InvalidPosition => write!(f, "servo position outside [0.0, 1.0]"),
            ActuatorError::HardwareFault => write!(f, "actuator hardware fault"),
        }
    }
}

impl core::error::Error for ActuatorError {}

/// Motor run mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Open-loop power control
    #[default]
    WithoutEncoder,
    /// Closed-loop velocity control using the encoder
    UsingEncoder,
    /// Proportional position seeking toward the target position
    ToPosition,
}

/// Shaft direction that counts as positive power
///
/// Mirror-mounted motors are set to [`Direction::Reverse`] at wiring time so
/// that positive power and encoder counts mean "robot forward" on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    /// +1.0 for forward, -1.0 for reverse.
    pub const fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

/// Open-loop power control.
pub trait PowerActuator {
    /// Command power in [-1.0, +1.0].
    ///
    /// # Errors
    ///
    /// Returns `ActuatorError::InvalidPower` if `power` is outside the range.
    fn set_power(&mut self, power: f32) -> Result<(), ActuatorError>;

    /// Last commanded power.
    fn power(&self) -> f32;

    /// Set which shaft direction positive power, velocity and encoder
    /// counts refer to.
    fn set_direction(&mut self, direction: Direction) -> Result<(), ActuatorError>;

    /// Configured direction.
    fn direction(&self) -> Direction;
}

/// Closed-loop velocity control (flywheel).
pub trait VelocityActuator: PowerActuator {
    /// Command a velocity setpoint in encoder ticks per second.
    fn set_velocity(&mut self, ticks_per_sec: f32) -> Result<(), ActuatorError>;

    /// Measured velocity in encoder ticks per second.
    fn velocity(&self) -> f32;
}

/// Motor with encoder feedback and run-to-position support (drive sides).
pub trait EncoderActuator: PowerActuator {
    /// Current encoder position in ticks.
    fn current_position(&self) -> i32;

    /// Absolute target used while in [`RunMode::ToPosition`].
    fn set_target_position(&mut self, ticks: i32) -> Result<(), ActuatorError>;

    /// Switch run mode.
    fn set_run_mode(&mut self, mode: RunMode) -> Result<(), ActuatorError>;

    /// Current run mode.
    fn run_mode(&self) -> RunMode;

    /// True while the motor is still seeking its target position.
    fn is_busy(&self) -> bool;
}

/// Positional servo.
pub trait GateServo {
    /// Command a position in [0.0, 1.0].
    ///
    /// # Errors
    ///
    /// Returns `ActuatorError::InvalidPosition` if outside the range.
    fn set_position(&mut self, position: f32) -> Result<(), ActuatorError>;

    /// Last commanded position.
    fn position(&self) -> f32;
}

/// Validate a power command against [-1.0, +1.0].
#[inline]
pub fn check_power(power: f32) -> Result<f32, ActuatorError> {
    if (-1.0..=1.0).contains(&power) {
        Ok(power)
    } else {
        Err(ActuatorError::InvalidPower)
    }
}

/// Validate a servo position against [0.0, 1.0].
#[inline]
pub fn check_position(position: f32) -> Result<f32, ActuatorError> {
    if (0.0..=1.0).contains(&position) {
        Ok(position)
    } else {
        Err(ActuatorError::InvalidPosition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_power_bounds() {
        assert_eq!(check_power(1.0), Ok(1.0));
        assert_eq!(check_power(-1.0), Ok(-1.0));
        assert_eq!(check_power(0.0), Ok(0.0));
        assert_eq!(check_power(1.01), Err(ActuatorError::InvalidPower));
        assert_eq!(check_power(-2.0), Err(ActuatorError::InvalidPower));
        assert_eq!(check_power(f32::NAN), Err(ActuatorError::InvalidPower));
    }

    #[test]
    fn test_check_position_bounds() {
        assert_eq!(check_position(0.2), Ok(0.2));
        assert_eq!(check_position(-0.1), Err(ActuatorError::InvalidPosition));
        assert_eq!(check_position(1.5), Err(ActuatorError::InvalidPosition));
    }

    #[test]
    fn test_run_mode_default_is_open_loop() {
        assert_eq!(RunMode::default(), RunMode::WithoutEncoder);
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::default(), Direction::Forward);
        assert_eq!(Direction::Forward.sign(), 1.0);
        assert_eq!(Direction::Reverse.sign(), -1.0);
    }
}
