//! Robot configuration
//!
//! Collects every parameter block plus the device names and the mode cycle
//! into one value handed to the controller. Loading validates each block, so
//! a bad value is a startup `ConfigError` instead of odd behavior mid-match.

use starterbot_core::error::ConfigError;
use starterbot_core::hardware::{DeviceNames, MotorDirections};
use starterbot_core::mode::{OperatingMode, DRIVE_CYCLE, MATCH_CYCLE};
use starterbot_core::parameters::{
    AutoParams, DriveParams, FeederParams, ParameterStore, ShooterParams,
};

use crate::log_info;

/// Complete op-mode configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotConfig {
    pub shooter: ShooterParams,
    pub feeder: FeederParams,
    pub drive: DriveParams,
    pub auto: AutoParams,
    pub devices: DeviceNames,
    /// Which motors are mounted mirror-image
    pub directions: MotorDirections,
    /// Modes the selector cycles through during init
    pub cycle: &'static [OperatingMode],
    /// Selection shown when init begins
    pub initial_mode: OperatingMode,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            shooter: ShooterParams::default(),
            feeder: FeederParams::default(),
            drive: DriveParams::default(),
            auto: AutoParams::default(),
            devices: DeviceNames::default(),
            directions: MotorDirections::match_robot(),
            cycle: MATCH_CYCLE,
            initial_mode: OperatingMode::TeleOp,
        }
    }
}

impl RobotConfig {
    /// Match program: TeleOp / AutoBlue / AutoRed chosen with the Home button.
    pub fn match_program() -> Self {
        Self::default()
    }

    /// Drive program with its mode fixed by configuration.
    ///
    /// `mode` should be one of Keyboard, Gamepad or Autonomous.
    pub fn drive_program(mode: OperatingMode) -> Self {
        Self {
            directions: MotorDirections::drive_base(),
            cycle: DRIVE_CYCLE,
            initial_mode: mode,
            ..Self::default()
        }
    }

    /// Register every parameter block's defaults.
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ConfigError> {
        ShooterParams::register_defaults(store)?;
        FeederParams::register_defaults(store)?;
        DriveParams::register_defaults(store)?;
        AutoParams::register_defaults(store)?;
        Ok(())
    }

    /// Load parameter blocks from `store` over this configuration.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidParameters` names the first block that fails
    /// validation.
    pub fn with_store(self, store: &ParameterStore) -> Result<Self, ConfigError> {
        let config = Self {
            shooter: ShooterParams::from_store(store),
            feeder: FeederParams::from_store(store),
            drive: DriveParams::from_store(store),
            auto: AutoParams::from_store(store),
            ..self
        };
        config.validate()?;
        for name in store.overridden() {
            log_info!("parameter {} overridden", name);
        }
        Ok(config)
    }

    /// Check every block and the mode cycle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.shooter.is_valid() {
            return Err(ConfigError::InvalidParameters { block: "shooter" });
        }
        if !self.feeder.is_valid() {
            return Err(ConfigError::InvalidParameters { block: "feeder" });
        }
        if !self.drive.is_valid() {
            return Err(ConfigError::InvalidParameters { block: "drive" });
        }
        if !self.auto.is_valid() {
            return Err(ConfigError::InvalidParameters { block: "auto" });
        }
        if !self.cycle.contains(&self.initial_mode) {
            return Err(ConfigError::InvalidParameters { block: "mode" });
        }
        Ok(())
    }
}
