//! Simulated hardware map
//!
//! Devices are registered by name, the same names the robot controller
//! configuration uses. The controller resolves them through
//! [`HardwareMap`]; the simulation keeps its own handles to step physics.

use std::collections::BTreeMap;

use starterbot_core::error::ConfigError;
use starterbot_core::hardware::{DeviceNames, HardwareMap, MotorDirections};
use starterbot_core::traits::Direction;

use crate::error::SimError;
use crate::motor::{MotorConfig, SimMotor};
use crate::servo::SimServo;

#[derive(Debug, Clone)]
enum SimDevice {
    Motor(SimMotor),
    Servo(SimServo),
}

/// Named simulated devices
#[derive(Debug, Default)]
pub struct SimHardwareMap {
    devices: BTreeMap<&'static str, SimDevice>,
}

impl SimHardwareMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map populated with every device the starter bot expects under `names`,
    /// each motor mounted the way `mounting` describes.
    pub fn starter_bot(
        names: &DeviceNames,
        mounting: &MotorDirections,
    ) -> Result<Self, SimError> {
        let mut map = Self::new();
        map.add_mounted_motor(names.left_drive, MotorConfig::DRIVE, mounting.left_drive)?;
        map.add_mounted_motor(names.right_drive, MotorConfig::DRIVE, mounting.right_drive)?;
        map.add_mounted_motor(names.flywheel, MotorConfig::FLYWHEEL, mounting.flywheel)?;
        map.add_mounted_motor(names.feeder, MotorConfig::AUXILIARY, mounting.feeder)?;
        map.add_mounted_motor(names.agitator, MotorConfig::AUXILIARY, mounting.agitator)?;
        map.add_servo(names.gate)?;
        Ok(map)
    }

    pub fn add_motor(
        &mut self,
        name: &'static str,
        config: MotorConfig,
    ) -> Result<SimMotor, SimError> {
        self.add_mounted_motor(name, config, Direction::Forward)
    }

    pub fn add_mounted_motor(
        &mut self,
        name: &'static str,
        config: MotorConfig,
        mounting: Direction,
    ) -> Result<SimMotor, SimError> {
        let motor = SimMotor::mounted(config, mounting);
        self.insert(name, SimDevice::Motor(motor.clone()))?;
        Ok(motor)
    }

    pub fn add_servo(&mut self, name: &'static str) -> Result<SimServo, SimError> {
        let servo = SimServo::new();
        self.insert(name, SimDevice::Servo(servo.clone()))?;
        Ok(servo)
    }

    /// Drop a device, e.g. to model a miswired configuration.
    pub fn remove(&mut self, name: &str) -> bool {
        self.devices.remove(name).is_some()
    }

    pub fn motor(&self, name: &str) -> Option<SimMotor> {
        match self.devices.get(name) {
            Some(SimDevice::Motor(m)) => Some(m.clone()),
            _ => None,
        }
    }

    pub fn servo(&self, name: &str) -> Option<SimServo> {
        match self.devices.get(name) {
            Some(SimDevice::Servo(s)) => Some(s.clone()),
            _ => None,
        }
    }

    /// Advance every motor's physics by `dt_ms`.
    pub fn step(&self, dt_ms: u64) {
        for device in self.devices.values() {
            if let SimDevice::Motor(motor) = device {
                motor.step(dt_ms);
            }
        }
    }

    fn insert(&mut self, name: &'static str, device: SimDevice) -> Result<(), SimError> {
        if self.devices.contains_key(name) {
            return Err(SimError::DuplicateDevice(name));
        }
        self.devices.insert(name, device);
        Ok(())
    }

    fn resolve_motor(&self, name: &'static str) -> Result<SimMotor, ConfigError> {
        match self.devices.get(name) {
            Some(SimDevice::Motor(m)) => Ok(m.clone()),
            Some(SimDevice::Servo(_)) => Err(ConfigError::DeviceMismatch {
                name,
                expected: "motor",
            }),
            None => Err(ConfigError::MissingDevice { name }),
        }
    }
}

impl HardwareMap for SimHardwareMap {
    type Drive = SimMotor;
    type Flywheel = SimMotor;
    type Motor = SimMotor;
    type Gate = SimServo;

    fn drive_motor(&mut self, name: &'static str) -> Result<SimMotor, ConfigError> {
        self.resolve_motor(name)
    }

    fn flywheel(&mut self, name: &'static str) -> Result<SimMotor, ConfigError> {
        self.resolve_motor(name)
    }

    fn power_motor(&mut self, name: &'static str) -> Result<SimMotor, ConfigError> {
        self.resolve_motor(name)
    }

    fn gate_servo(&mut self, name: &'static str) -> Result<SimServo, ConfigError> {
        match self.devices.get(name) {
            Some(SimDevice::Servo(s)) => Ok(s.clone()),
            Some(SimDevice::Motor(_)) => Err(ConfigError::DeviceMismatch {
                name,
                expected: "servo",
            }),
            None => Err(ConfigError::MissingDevice { name }),
        }
    }
}
