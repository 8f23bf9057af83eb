//! Hardware capability bundle
//!
//! Control logic receives one explicit [`Hardware`] value instead of reaching
//! for global device handles. The bundle is built once at startup from a
//! [`HardwareMap`]; a missing device aborts startup with a [`ConfigError`].
//!
//! All command helpers mirror what they send into [`RobotState`].

use crate::error::ConfigError;
use crate::state::RobotState;
use crate::traits::{
    ActuatorError, Direction, EncoderActuator, GateServo, PowerActuator, RunMode,
    VelocityActuator,
};

/// Device names as configured on the robot controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceNames {
    pub left_drive: &'static str,
    pub right_drive: &'static str,
    pub flywheel: &'static str,
    pub feeder: &'static str,
    pub agitator: &'static str,
    pub gate: &'static str,
}

impl Default for DeviceNames {
    fn default() -> Self {
        Self {
            left_drive: "leftDrive",
            right_drive: "rightDrive",
            flywheel: "flywheel",
            feeder: "coreHex",
            agitator: "servo",
            gate: "artifactstopper",
        }
    }
}

/// Positive direction of each motor
///
/// Motors mounted mirror-image on the chassis are reversed so positive power
/// means "robot forward" (or "shoot") on every device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotorDirections {
    pub left_drive: Direction,
    pub right_drive: Direction,
    pub flywheel: Direction,
    pub feeder: Direction,
    pub agitator: Direction,
}

impl MotorDirections {
    /// Shooter build: left drive, flywheel and feeder are mirrored.
    pub const fn match_robot() -> Self {
        Self {
            left_drive: Direction::Reverse,
            right_drive: Direction::Forward,
            flywheel: Direction::Reverse,
            feeder: Direction::Reverse,
            agitator: Direction::Forward,
        }
    }

    /// Drive-only build: just the left drive is mirrored.
    pub const fn drive_base() -> Self {
        Self {
            left_drive: Direction::Reverse,
            right_drive: Direction::Forward,
            flywheel: Direction::Forward,
            feeder: Direction::Forward,
            agitator: Direction::Forward,
        }
    }
}

/// Named-device lookup supplied by the host runtime.
///
/// Each getter hands out the specific capability requested, so a flywheel is
/// resolved as a [`VelocityActuator`] at wiring time.
pub trait HardwareMap {
    type Drive: EncoderActuator;
    type Flywheel: VelocityActuator;
    type Motor: PowerActuator;
    type Gate: GateServo;

    /// Resolve a drive motor with encoder support.
    fn drive_motor(&mut self, name: &'static str) -> Result<Self::Drive, ConfigError>;

    /// Resolve a velocity-controlled motor.
    fn flywheel(&mut self, name: &'static str) -> Result<Self::Flywheel, ConfigError>;

    /// Resolve an open-loop motor or continuous-rotation servo.
    fn power_motor(&mut self, name: &'static str) -> Result<Self::Motor, ConfigError>;

    /// Resolve a positional servo.
    fn gate_servo(&mut self, name: &'static str) -> Result<Self::Gate, ConfigError>;
}

/// Hardware bundle owned by the control loop
pub struct Hardware<D, F, P, G> {
    pub left_drive: D,
    pub right_drive: D,
    pub flywheel: F,
    pub feeder: P,
    pub agitator: P,
    pub gate: G,
}

impl<D, F, P, G> Hardware<D, F, P, G>
where
    D: EncoderActuator,
    F: VelocityActuator,
    P: PowerActuator,
    G: GateServo,
{
    /// Resolve every named device from the host map and set each motor's
    /// direction.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` the map reports, or
    /// `ConfigError::DeviceSetup` if a motor rejects its direction.
    pub fn from_map<M>(
        map: &mut M,
        names: &DeviceNames,
        directions: &MotorDirections,
    ) -> Result<Self, ConfigError>
    where
        M: HardwareMap<Drive = D, Flywheel = F, Motor = P, Gate = G>,
    {
        let mut hw = Self {
            left_drive: map.drive_motor(names.left_drive)?,
            right_drive: map.drive_motor(names.right_drive)?,
            flywheel: map.flywheel(names.flywheel)?,
            feeder: map.power_motor(names.feeder)?,
            agitator: map.power_motor(names.agitator)?,
            gate: map.gate_servo(names.gate)?,
        };

        orient(&mut hw.left_drive, names.left_drive, directions.left_drive)?;
        orient(&mut hw.right_drive, names.right_drive, directions.right_drive)?;
        orient(&mut hw.flywheel, names.flywheel, directions.flywheel)?;
        orient(&mut hw.feeder, names.feeder, directions.feeder)?;
        orient(&mut hw.agitator, names.agitator, directions.agitator)?;
        Ok(hw)
    }

    /// Command both drive sides.
    pub fn drive(
        &mut self,
        state: &mut RobotState,
        left: f32,
        right: f32,
    ) -> Result<(), ActuatorError> {
        self.left_drive.set_power(left)?;
        self.right_drive.set_power(right)?;
        state.drive_left = left;
        state.drive_right = right;
        Ok(())
    }

    /// Zero both drive sides.
    pub fn stop_drive(&mut self, state: &mut RobotState) -> Result<(), ActuatorError> {
        self.drive(state, 0.0, 0.0)
    }

    /// Put both drive sides in `mode`.
    pub fn set_drive_mode(&mut self, mode: RunMode) -> Result<(), ActuatorError> {
        self.left_drive.set_run_mode(mode)?;
        self.right_drive.set_run_mode(mode)
    }

    /// Closed-loop flywheel setpoint.
    pub fn flywheel_velocity(
        &mut self,
        state: &mut RobotState,
        ticks_per_sec: f32,
    ) -> Result<(), ActuatorError> {
        self.flywheel.set_velocity(ticks_per_sec)?;
        state.flywheel_target_velocity = ticks_per_sec;
        state.flywheel_power = 0.0;
        Ok(())
    }

    /// Open-loop flywheel power.
    pub fn flywheel_power(
        &mut self,
        state: &mut RobotState,
        power: f32,
    ) -> Result<(), ActuatorError> {
        self.flywheel.set_power(power)?;
        state.flywheel_power = power;
        state.flywheel_target_velocity = 0.0;
        Ok(())
    }

    /// Feeder motor power.
    pub fn feeder(&mut self, state: &mut RobotState, power: f32) -> Result<(), ActuatorError> {
        self.feeder.set_power(power)?;
        state.feeder_power = power;
        Ok(())
    }

    /// Hopper agitator power.
    pub fn agitator(&mut self, state: &mut RobotState, power: f32) -> Result<(), ActuatorError> {
        self.agitator.set_power(power)?;
        state.agitator_power = power;
        Ok(())
    }

    /// Gate servo position.
    pub fn gate(&mut self, state: &mut RobotState, position: f32) -> Result<(), ActuatorError> {
        self.gate.set_position(position)?;
        state.gate_position = position;
        Ok(())
    }

    /// Drive everything to rest: motors zero, drive back in open-loop mode,
    /// gate closed, shooting flag cleared.
    ///
    /// Every command is attempted even if an earlier one fails; the first
    /// failure is returned.
    pub fn safe_state(
        &mut self,
        state: &mut RobotState,
        gate_closed: f32,
    ) -> Result<(), ActuatorError> {
        state.drive_left = 0.0;
        state.drive_right = 0.0;
        let results = [
            self.left_drive.set_power(0.0),
            self.right_drive.set_power(0.0),
            self.left_drive.set_run_mode(RunMode::WithoutEncoder),
            self.right_drive.set_run_mode(RunMode::WithoutEncoder),
            self.flywheel_velocity(state, 0.0),
            self.flywheel_power(state, 0.0),
            self.feeder(state, 0.0),
            self.agitator(state, 0.0),
            self.gate(state, gate_closed),
        ];
        state.is_shooting = false;

        results.into_iter().find(|r| r.is_err()).unwrap_or(Ok(()))
    }
}

fn orient<A: PowerActuator>(
    motor: &mut A,
    name: &'static str,
    direction: Direction,
) -> Result<(), ConfigError> {
    motor
        .set_direction(direction)
        .map_err(|error| ConfigError::DeviceSetup { name, error })
}

/// Mock devices for unit tests
///
/// Always available, like [`MockTime`](crate::traits::MockTime), so the op
/// mode crate tests against the same doubles.
pub mod mock {
    use super::*;
    use crate::traits::{check_position, check_power};

    #[derive(Debug, Default)]
    pub struct MockMotor {
        pub power: f32,
        pub velocity_setpoint: f32,
        pub measured_velocity: f32,
        pub position: i32,
        pub target: i32,
        pub mode: RunMode,
        pub direction: Direction,
        pub busy: bool,
        pub fail: bool,
    }

    impl MockMotor {
        fn check(&self) -> Result<(), ActuatorError> {
            if self.fail {
                Err(ActuatorError::HardwareFault)
            } else {
                Ok(())
            }
        }
    }

    impl PowerActuator for MockMotor {
        fn set_power(&mut self, power: f32) -> Result<(), ActuatorError> {
            self.check()?;
            self.power = check_power(power)?;
            Ok(())
        }

        fn power(&self) -> f32 {
            self.power
        }

        fn set_direction(&mut self, direction: Direction) -> Result<(), ActuatorError> {
            self.check()?;
            self.direction = direction;
            Ok(())
        }

        fn direction(&self) -> Direction {
            self.direction
        }
    }

    impl VelocityActuator for MockMotor {
        fn set_velocity(&mut self, ticks_per_sec: f32) -> Result<(), ActuatorError> {
            self.check()?;
            self.velocity_setpoint = ticks_per_sec;
            Ok(())
        }

        fn velocity(&self) -> f32 {
            self.measured_velocity
        }
    }

    impl EncoderActuator for MockMotor {
        fn current_position(&self) -> i32 {
            self.position
        }

        fn set_target_position(&mut self, ticks: i32) -> Result<(), ActuatorError> {
            self.check()?;
            self.target = ticks;
            self.busy = ticks != self.position;
            Ok(())
        }

        fn set_run_mode(&mut self, mode: RunMode) -> Result<(), ActuatorError> {
            self.check()?;
            self.mode = mode;
            Ok(())
        }

        fn run_mode(&self) -> RunMode {
            self.mode
        }

        fn is_busy(&self) -> bool {
            self.mode == RunMode::ToPosition && self.busy
        }
    }

    #[derive(Debug, Default)]
    pub struct MockServo {
        pub position: f32,
    }

    impl GateServo for MockServo {
        fn set_position(&mut self, position: f32) -> Result<(), ActuatorError> {
            self.position = check_position(position)?;
            Ok(())
        }

        fn position(&self) -> f32 {
            self.position
        }
    }

    pub type MockHardware = Hardware<MockMotor, MockMotor, MockMotor, MockServo>;

    pub fn hardware() -> MockHardware {
        Hardware {
            left_drive: MockMotor::default(),
            right_drive: MockMotor::default(),
            flywheel: MockMotor::default(),
            feeder: MockMotor::default(),
            agitator: MockMotor::default(),
            gate: MockServo::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;
    use crate::mode::OperatingMode;

    #[derive(Default)]
    struct MissingGateMap {
        faulty_flywheel: bool,
    }

    impl HardwareMap for MissingGateMap {
        type Drive = MockMotor;
        type Flywheel = MockMotor;
        type Motor = MockMotor;
        type Gate = MockServo;

        fn drive_motor(&mut self, _name: &'static str) -> Result<MockMotor, ConfigError> {
            Ok(MockMotor::default())
        }

        fn flywheel(&mut self, _name: &'static str) -> Result<MockMotor, ConfigError> {
            Ok(MockMotor {
                fail: self.faulty_flywheel,
                ..MockMotor::default()
            })
        }

        fn power_motor(&mut self, _name: &'static str) -> Result<MockMotor, ConfigError> {
            Ok(MockMotor::default())
        }

        fn gate_servo(&mut self, name: &'static str) -> Result<MockServo, ConfigError> {
            if name == "artifactstopper" {
                Err(ConfigError::MissingDevice { name })
            } else {
                Ok(MockServo::default())
            }
        }
    }

    fn names_with_gate(gate: &'static str) -> DeviceNames {
        DeviceNames {
            gate,
            ..DeviceNames::default()
        }
    }

    #[test]
    fn test_from_map_reports_missing_device() {
        let result = MockHardware::from_map(
            &mut MissingGateMap::default(),
            &DeviceNames::default(),
            &MotorDirections::default(),
        );
        assert_eq!(
            result.err(),
            Some(ConfigError::MissingDevice {
                name: "artifactstopper"
            })
        );
    }

    #[test]
    fn test_from_map_applies_directions() {
        let hw = MockHardware::from_map(
            &mut MissingGateMap::default(),
            &names_with_gate("gate"),
            &MotorDirections::match_robot(),
        )
        .unwrap();

        assert_eq!(hw.left_drive.direction, Direction::Reverse);
        assert_eq!(hw.right_drive.direction, Direction::Forward);
        assert_eq!(hw.flywheel.direction, Direction::Reverse);
        assert_eq!(hw.feeder.direction, Direction::Reverse);
        assert_eq!(hw.agitator.direction, Direction::Forward);
    }

    #[test]
    fn test_from_map_reports_direction_fault() {
        let mut map = MissingGateMap {
            faulty_flywheel: true,
        };
        let result = MockHardware::from_map(
            &mut map,
            &names_with_gate("gate"),
            &MotorDirections::drive_base(),
        );
        assert_eq!(
            result.err(),
            Some(ConfigError::DeviceSetup {
                name: "flywheel",
                error: ActuatorError::HardwareFault,
            })
        );
    }

    #[test]
    fn test_drive_mirrors_state() {
        let mut hw = hardware();
        let mut state = RobotState::new(OperatingMode::Gamepad, 0.2);

        hw.drive(&mut state, 0.5, -0.25).unwrap();
        assert_eq!(hw.left_drive.power, 0.5);
        assert_eq!(hw.right_drive.power, -0.25);
        assert_eq!(state.drive_left, 0.5);
        assert_eq!(state.drive_right, -0.25);
    }

    #[test]
    fn test_invalid_power_leaves_state_untouched() {
        let mut hw = hardware();
        let mut state = RobotState::new(OperatingMode::Gamepad, 0.2);

        assert_eq!(hw.feeder(&mut state, 1.5), Err(ActuatorError::InvalidPower));
        assert_eq!(state.feeder_power, 0.0);
    }

    #[test]
    fn test_safe_state() {
        let mut hw = hardware();
        let mut state = RobotState::new(OperatingMode::TeleOp, 0.2);

        hw.drive(&mut state, 1.0, 1.0).unwrap();
        hw.flywheel_velocity(&mut state, 1300.0).unwrap();
        hw.feeder(&mut state, 1.0).unwrap();
        hw.gate(&mut state, 0.0).unwrap();
        hw.set_drive_mode(RunMode::ToPosition).unwrap();
        state.is_shooting = true;

        hw.safe_state(&mut state, 0.2).unwrap();
        assert!(state.is_safe(0.2));
        assert_eq!(hw.left_drive.mode, RunMode::WithoutEncoder);
        assert_eq!(hw.flywheel.velocity_setpoint, 0.0);
        assert_eq!(hw.gate.position, 0.2);
    }

    #[test]
    fn test_safe_state_attempts_everything_on_failure() {
        let mut hw = hardware();
        let mut state = RobotState::new(OperatingMode::TeleOp, 0.2);
        hw.gate(&mut state, 0.0).unwrap();
        hw.left_drive.fail = true;

        assert_eq!(
            hw.safe_state(&mut state, 0.2),
            Err(ActuatorError::HardwareFault)
        );
        // Gate still closed despite the drive failure
        assert_eq!(hw.gate.position, 0.2);
        assert!(!state.is_shooting);
    }
}
