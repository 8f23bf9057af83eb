//! Driver-controlled handlers
//!
//! - Keyboard: `i`/`k` forward and back, `j`/`l` turn, `p` fires one timed shot
//! - Gamepad: left stick forward, right stick turn, Cross fires one timed shot
//! - Split stick: same drive, plus flywheel presets with velocity-gated
//!   feeding and manual feeder/agitator control
//!
//! Drive inputs are ignored while a timed shot is running.

use starterbot_core::kinematics::DifferentialDrive;
use starterbot_core::shooter::ShotPreset;
use starterbot_core::traits::input::{KEY_BACKWARD, KEY_FORWARD, KEY_LEFT, KEY_RIGHT, KEY_SHOOT};
use starterbot_core::traits::{
    ActuatorError, Axis, Button, EncoderActuator, GateServo, InputSource, PowerActuator,
    TimeSource, VelocityActuator,
};

use super::{OpModeController, TickStatus};
use crate::log_debug;

/// Flywheel power while clearing a jam
const REVERSE_POWER: f32 = -0.5;

/// Manual feeder power (Cross forward, Triangle reverse)
const MANUAL_FEED_POWER: f32 = 0.5;

/// Manual agitator power (dpad left forward, dpad right reverse)
const MANUAL_AGITATOR_POWER: f32 = 1.0;

impl<D, F, P, G, T> OpModeController<D, F, P, G, T>
where
    D: EncoderActuator,
    F: VelocityActuator,
    P: PowerActuator,
    G: GateServo,
    T: TimeSource,
{
    pub(super) fn keyboard_drive(
        &mut self,
        input: &mut dyn InputSource,
        now_ms: u64,
    ) -> Result<TickStatus, ActuatorError> {
        let forward = input.key_axis(Button::Key(KEY_FORWARD), Button::Key(KEY_BACKWARD));
        let turn = input.key_axis(Button::Key(KEY_RIGHT), Button::Key(KEY_LEFT));
        let shoot = input.is_pressed(Button::Key(KEY_SHOOT));

        self.arcade_with_shot(forward, turn, shoot, now_ms)
    }

    pub(super) fn gamepad_drive(
        &mut self,
        input: &mut dyn InputSource,
        now_ms: u64,
    ) -> Result<TickStatus, ActuatorError> {
        let forward = -input.axis(Axis::LeftStickY);
        let turn = input.axis(Axis::RightStickX);
        let shoot = input.is_pressed(Button::Cross);

        self.arcade_with_shot(forward, turn, shoot, now_ms)
    }

    /// Drive unless shooting; a held trigger starts a shot only when idle.
    fn arcade_with_shot(
        &mut self,
        forward: f32,
        turn: f32,
        shoot: bool,
        now_ms: u64,
    ) -> Result<TickStatus, ActuatorError> {
        self.sequencer.update(&mut self.hw, &mut self.state, now_ms)?;

        if !self.state.is_shooting {
            let (left, right) =
                DifferentialDrive::mix_normalized(forward, turn, self.config.drive.max_power);
            self.hw.drive(&mut self.state, left, right)?;

            if shoot && self.sequencer.trigger(&mut self.hw, &mut self.state, now_ms)? {
                log_debug!("shot triggered at {} ms", now_ms);
            }
        }

        Ok(TickStatus::Running)
    }

    pub(super) fn split_stick_teleop(
        &mut self,
        input: &mut dyn InputSource,
    ) -> Result<TickStatus, ActuatorError> {
        let forward = -input.axis(Axis::LeftStickY);
        let turn = input.axis(Axis::RightStickX);
        let (left, right) =
            DifferentialDrive::mix_normalized(forward, turn, self.config.drive.max_power);
        self.hw.drive(&mut self.state, left, right)?;

        self.flywheel_control(input)?;
        self.manual_feed_control(input)?;

        Ok(TickStatus::Running)
    }

    fn flywheel_control(&mut self, input: &dyn InputSource) -> Result<(), ActuatorError> {
        let feeder = self.config.feeder;

        if input.is_pressed(Button::Options) {
            self.hw.flywheel_power(&mut self.state, REVERSE_POWER)
        } else if input.is_pressed(Button::LeftBumper) {
            self.feeder
                .feed(&mut self.hw, &mut self.state, feeder.target(ShotPreset::Far))
                .map(|_| ())
        } else if input.is_pressed(Button::RightBumper) {
            self.feeder
                .feed(&mut self.hw, &mut self.state, feeder.target(ShotPreset::Bank))
                .map(|_| ())
        } else if input.is_pressed(Button::Circle) {
            self.hw
                .flywheel_velocity(&mut self.state, feeder.velocity(ShotPreset::Bank))
        } else if input.is_pressed(Button::Square) {
            self.hw
                .flywheel_velocity(&mut self.state, feeder.velocity(ShotPreset::Max))
        } else {
            self.hw.flywheel_velocity(&mut self.state, 0.0)?;
            self.hw.feeder(&mut self.state, 0.0)?;
            // The agitator stays under manual control while a dpad button is held
            if !input.is_pressed(Button::DpadLeft) && !input.is_pressed(Button::DpadRight) {
                self.hw.agitator(&mut self.state, 0.0)?;
            }
            Ok(())
        }
    }

    fn manual_feed_control(&mut self, input: &dyn InputSource) -> Result<(), ActuatorError> {
        if input.is_pressed(Button::Cross) {
            self.hw.feeder(&mut self.state, MANUAL_FEED_POWER)?;
        } else if input.is_pressed(Button::Triangle) {
            self.hw.feeder(&mut self.state, -MANUAL_FEED_POWER)?;
        }

        if input.is_pressed(Button::DpadLeft) {
            self.hw.agitator(&mut self.state, MANUAL_AGITATOR_POWER)?;
        } else if input.is_pressed(Button::DpadRight) {
            self.hw.agitator(&mut self.state, -MANUAL_AGITATOR_POWER)?;
        }
        Ok(())
    }
}
