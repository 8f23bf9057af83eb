//! Robot state record
//!
//! The control loop is the only writer. Every actuator command issued through
//! [`Hardware`](crate::hardware::Hardware) is mirrored here, so telemetry
//! reads one consistent snapshot per tick.

use crate::mode::OperatingMode;

/// Mutable record of the commanded robot outputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotState {
    /// Left drive power [-1.0, +1.0]
    pub drive_left: f32,
    /// Right drive power [-1.0, +1.0]
    pub drive_right: f32,
    /// Flywheel velocity setpoint (ticks/s); 0 when under power control
    pub flywheel_target_velocity: f32,
    /// Flywheel open-loop power, used by the timed shot sequence
    pub flywheel_power: f32,
    /// Feeder motor power
    pub feeder_power: f32,
    /// Hopper agitator power
    pub agitator_power: f32,
    /// Gate servo position
    pub gate_position: f32,
    /// True iff a shot sequence is active
    pub is_shooting: bool,
    /// Selected operating mode
    pub mode: OperatingMode,
}

impl RobotState {
    /// Initial state with the gate at `gate_closed`.
    pub fn new(mode: OperatingMode, gate_closed: f32) -> Self {
        Self {
            drive_left: 0.0,
            drive_right: 0.0,
            flywheel_target_velocity: 0.0,
            flywheel_power: 0.0,
            feeder_power: 0.0,
            agitator_power: 0.0,
            gate_position: gate_closed,
            is_shooting: false,
            mode,
        }
    }

    /// True when every actuator is commanded to rest and the gate is closed.
    pub fn is_safe(&self, gate_closed: f32) -> bool {
        self.drive_left == 0.0
            && self.drive_right == 0.0
            && self.flywheel_target_velocity == 0.0
            && self.flywheel_power == 0.0
            && self.feeder_power == 0.0
            && self.agitator_power == 0.0
            && self.gate_position == gate_closed
            && !self.is_shooting
    }
}
