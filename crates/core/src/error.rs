//! Control error types
//!
//! - [`ConfigError`]: fatal, surfaced at startup (missing device, bad parameters)
//! - [`ControlError`]: failure during the active control loop
//!
//! Step timeouts and unknown selector states are not errors; they are
//! logged and the loop continues.

use core::fmt;

use crate::parameters::ParameterError;
use crate::traits::ActuatorError;

/// Startup configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Named device is not present in the hardware map
    MissingDevice {
        /// Configured device name
        name: &'static str,
    },
    /// Named device exists but lacks the requested capability
    DeviceMismatch {
        /// Configured device name
        name: &'static str,
        /// Capability that was requested
        expected: &'static str,
    },
    /// Named device rejected its startup configuration
    DeviceSetup {
        /// Configured device name
        name: &'static str,
        /// Error the driver reported
        error: ActuatorError,
    },
    /// Parameter block failed validation
    InvalidParameters {
        /// Parameter block name
        block: &'static str,
    },
    /// Autonomous script exceeds the step capacity
    ScriptTooLong {
        /// Maximum number of steps
        max: usize,
    },
    /// Parameter store rejected a registration or update
    Parameter(ParameterError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingDevice { name } => {
                write!(f, "hardware device '{}' not found", name)
            }
            ConfigError::DeviceMismatch { name, expected } => {
                write!(f, "hardware device '{}' is not a {}", name, expected)
            }
            ConfigError::DeviceSetup { name, error } => {
                write!(f, "hardware device '{}' rejected setup: {}", name, error)
            }
            ConfigError::InvalidParameters { block } => {
                write!(f, "invalid {} parameters", block)
            }
            ConfigError::ScriptTooLong { max } => {
                write!(f, "autonomous script longer than {} steps", max)
            }
            ConfigError::Parameter(e) => write!(f, "parameter store: {}", e),
        }
    }
}

impl core::error::Error for ConfigError {}

impl From<ParameterError> for ConfigError {
    fn from(e: ParameterError) -> Self {
        ConfigError::Parameter(e)
    }
}

/// Active control loop errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// An actuator command failed; the robot was forced to the safe state
    Actuator(ActuatorError),
    /// `tick` was called before `start`
    NotStarted,
    /// `start` was called after the op mode stopped
    Stopped,
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::Actuator(e) => write!(f, "actuator command failed: {}", e),
            ControlError::NotStarted => write!(f, "op mode has not been started"),
            ControlError::Stopped => write!(f, "op mode already stopped"),
        }
    }
}

impl core::error::Error for ControlError {}

impl From<ActuatorError> for ControlError {
    fn from(e: ActuatorError) -> Self {
        ControlError::Actuator(e)
    }
}
