//! Op-mode controller
//!
//! ## Lifecycle
//!
//! 1. `init_tick()` - Called every loop iteration before start; runs the mode
//!    selector
//! 2. `start()` - Locks the selection and prepares the selected program
//! 3. `tick()` - Called every loop iteration while the op mode is active
//! 4. `stop()` - Forces the safe state; also triggered by an inactive `tick()`
//!
//! ## Safety
//!
//! - Any actuator failure during `tick()` forces the safe state before the
//!   error is returned to the host
//! - Stop unwinds a running shot or script within the same call

pub mod scripts;
mod teleop;

use starterbot_core::autonomous::{
    Alliance, AutoScript, AutoStep, AutonomousRunner, RunnerStatus, ShootBound,
};
use starterbot_core::error::{ConfigError, ControlError};
use starterbot_core::hardware::{Hardware, HardwareMap};
use starterbot_core::mode::{ModeSelector, OperatingMode};
use starterbot_core::shooter::{FeederGate, ShotSequencer};
use starterbot_core::state::RobotState;
use starterbot_core::traits::{
    ActuatorError, Button, EncoderActuator, GateServo, InputSource, PowerActuator, RunMode,
    TelemetrySink, TimeSource, VelocityActuator,
};

use crate::config::RobotConfig;
use crate::{log_error, log_info, log_warn};

/// Result of one active tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Program is running
    Running,
    /// Program ran to completion; the robot is at rest
    Finished,
    /// Stop was requested; the robot is at rest
    Stopped,
}

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    Active,
    Finished,
    Stopped,
}

/// Handler driving the robot during the active phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Program {
    Keyboard,
    Gamepad,
    SplitStick,
    /// Autonomous script; `then_keyboard` hands over to keyboard drive at the end
    Script { then_keyboard: bool },
}

impl Program {
    fn for_mode(mode: OperatingMode) -> Self {
        match mode {
            OperatingMode::Keyboard => Program::Keyboard,
            OperatingMode::Gamepad => Program::Gamepad,
            OperatingMode::TeleOp => Program::SplitStick,
            OperatingMode::Autonomous => Program::Script {
                then_keyboard: true,
            },
            OperatingMode::AutoBlue | OperatingMode::AutoRed => Program::Script {
                then_keyboard: false,
            },
        }
    }
}

/// Tick-driven op-mode controller
///
/// Owns the hardware bundle and is the only writer of [`RobotState`].
pub struct OpModeController<D, F, P, G, T> {
    hw: Hardware<D, F, P, G>,
    state: RobotState,
    config: RobotConfig,
    time: T,
    selector: ModeSelector,
    sequencer: ShotSequencer,
    feeder: FeederGate,
    runner: Option<AutonomousRunner>,
    /// Encoder autonomous, authored for blue
    starter_script: AutoScript,
    /// Timed autonomous
    timed_script: AutoScript,
    phase: Phase,
    program: Program,
    initialized: bool,
    started_ms: u64,
}

impl<D, F, P, G, T> OpModeController<D, F, P, G, T>
where
    D: EncoderActuator,
    F: VelocityActuator,
    P: PowerActuator,
    G: GateServo,
    T: TimeSource,
{
    /// Build a controller around an already-resolved hardware bundle.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration fails validation or a
    /// built-in script does not fit.
    pub fn new(
        hw: Hardware<D, F, P, G>,
        config: RobotConfig,
        time: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let starter_script = scripts::starter_bot_auto(&config, Alliance::Blue)?;
        let timed_script = scripts::drive_to_goal(&config)?;

        Ok(Self {
            hw,
            state: RobotState::new(config.initial_mode, config.shooter.gate_closed),
            selector: ModeSelector::new(config.cycle, config.initial_mode),
            sequencer: ShotSequencer::new(&config.shooter),
            feeder: FeederGate::new(&config.feeder),
            runner: None,
            starter_script,
            timed_script,
            phase: Phase::Init,
            program: Program::for_mode(config.initial_mode),
            initialized: false,
            started_ms: 0,
            config,
            time,
        })
    }

    /// Resolve the configured devices from `map` and build a controller.
    pub fn from_map<M>(map: &mut M, config: RobotConfig, time: T) -> Result<Self, ConfigError>
    where
        M: HardwareMap<Drive = D, Flywheel = F, Motor = P, Gate = G>,
    {
        let hw = Hardware::from_map(map, &config.devices, &config.directions)?;
        Self::new(hw, config, time)
    }

    pub fn state(&self) -> &RobotState {
        &self.state
    }

    pub fn hardware(&self) -> &Hardware<D, F, P, G> {
        &self.hw
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// Clock the controller reads once per tick.
    pub fn time(&self) -> &T {
        &self.time
    }

    /// Current (or locked) mode selection.
    pub fn mode(&self) -> OperatingMode {
        self.selector.current()
    }

    /// Autonomous runner, once an autonomous program has started.
    pub fn runner(&self) -> Option<&AutonomousRunner> {
        self.runner.as_ref()
    }

    /// Init-phase tick: runs the selector on the Home button edge.
    ///
    /// The first call puts every actuator at rest with the gate closed.
    pub fn init_tick(
        &mut self,
        input: &mut dyn InputSource,
        telemetry: &mut dyn TelemetrySink,
    ) -> Result<OperatingMode, ControlError> {
        if !self.initialized {
            self.guard(|ctl| ctl.hw.safe_state(&mut ctl.state, ctl.config.shooter.gate_closed))?;
            self.initialized = true;
            log_info!("op mode initialized, selection {}", self.selector.current());
        }

        let cycle_next = input.was_pressed(Button::Home);
        let mode = self.selector.update(cycle_next, telemetry);
        self.state.mode = mode;
        telemetry.update();
        Ok(mode)
    }

    /// Start signal: lock the selection and prepare its program.
    ///
    /// # Errors
    ///
    /// `ControlError::Stopped` once [`stop`](Self::stop) has run; a stopped
    /// op mode never drives again.
    pub fn start(
        &mut self,
        telemetry: &mut dyn TelemetrySink,
    ) -> Result<OperatingMode, ControlError> {
        if self.phase == Phase::Stopped {
            return Err(ControlError::Stopped);
        }
        if !self.initialized {
            self.guard(|ctl| ctl.hw.safe_state(&mut ctl.state, ctl.config.shooter.gate_closed))?;
            self.initialized = true;
        }

        let mode = self.selector.lock();
        self.state.mode = mode;
        self.program = Program::for_mode(mode);
        self.started_ms = self.time.now_ms();
        self.phase = Phase::Active;

        if mode.is_autonomous() {
            let script = match Alliance::from_mode(mode) {
                Some(alliance) => self.starter_script.mirrored_for(alliance),
                None => self.timed_script.clone(),
            };
            let mut runner =
                AutonomousRunner::new(script, &self.config.shooter, &self.config.feeder);
            runner.start();
            self.runner = Some(runner);

            telemetry.add_data("RUNNING OPMODE", &mode);
            telemetry.update();
        }

        log_info!("op mode started: {}", mode);
        Ok(mode)
    }

    /// Active-phase tick.
    ///
    /// `active` is the host's run signal; when it drops, the controller stops
    /// and reports [`TickStatus::Stopped`], during init as well.
    ///
    /// # Errors
    ///
    /// `ControlError::NotStarted` before [`start`](Self::start). On
    /// `ControlError::Actuator` the robot has already been forced to rest.
    pub fn tick(
        &mut self,
        input: &mut dyn InputSource,
        telemetry: &mut dyn TelemetrySink,
        active: bool,
    ) -> Result<TickStatus, ControlError> {
        match self.phase {
            Phase::Init if active => return Err(ControlError::NotStarted),
            Phase::Init => {
                self.stop()?;
                return Ok(TickStatus::Stopped);
            }
            Phase::Stopped => return Ok(TickStatus::Stopped),
            Phase::Finished if active => return Ok(TickStatus::Finished),
            Phase::Finished | Phase::Active => {}
        }

        if !active {
            self.stop()?;
            return Ok(TickStatus::Stopped);
        }

        let now_ms = self.time.now_ms();
        let status = self.guard(|ctl| match ctl.program {
            Program::Keyboard => ctl.keyboard_drive(input, now_ms),
            Program::Gamepad => ctl.gamepad_drive(input, now_ms),
            Program::SplitStick => ctl.split_stick_teleop(input),
            Program::Script { then_keyboard } => ctl.run_script(then_keyboard, now_ms),
        })?;

        self.report(telemetry, now_ms);
        telemetry.update();

        if status == TickStatus::Finished {
            self.finish()?;
        }
        Ok(status)
    }

    /// Unwind to the safe state. Safe to call more than once.
    pub fn stop(&mut self) -> Result<(), ControlError> {
        if self.phase == Phase::Stopped {
            return Ok(());
        }
        self.phase = Phase::Stopped;
        log_info!("op mode stopping after {} ms", self.time.elapsed_since(self.started_ms));
        self.force_safe_state()
    }

    fn finish(&mut self) -> Result<(), ControlError> {
        self.phase = Phase::Finished;
        log_info!("program finished: {}", self.state.mode);
        self.force_safe_state()
    }

    fn force_safe_state(&mut self) -> Result<(), ControlError> {
        if let Some(runner) = self.runner.as_mut() {
            // The safe state below covers every actuator the runner touched
            if runner.abort(&mut self.hw, &mut self.state).is_err() {
                log_warn!("runner abort failed; forcing safe state");
            }
        }
        self.sequencer.reset(&mut self.state);
        self.hw
            .safe_state(&mut self.state, self.config.shooter.gate_closed)
            .map_err(|e| {
                log_error!("safe state incomplete: {}", e);
                ControlError::Actuator(e)
            })
    }

    /// Run `f`; on an actuator failure force the safe state and report the
    /// original error.
    fn guard<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, ActuatorError>,
    ) -> Result<R, ControlError> {
        f(self).map_err(|e| {
            log_error!("actuator command failed: {}", e);
            let _ = self.force_safe_state();
            ControlError::Actuator(e)
        })
    }

    fn run_script(
        &mut self,
        then_keyboard: bool,
        now_ms: u64,
    ) -> Result<TickStatus, ActuatorError> {
        let Some(runner) = self.runner.as_mut() else {
            return Ok(TickStatus::Finished);
        };

        match runner.update(&mut self.hw, &mut self.state, now_ms)? {
            RunnerStatus::Finished | RunnerStatus::Aborted if then_keyboard => {
                log_info!("autonomous finished, handing over to keyboard drive");
                self.program = Program::Keyboard;
                self.hw.set_drive_mode(RunMode::WithoutEncoder)?;
                Ok(TickStatus::Running)
            }
            RunnerStatus::Finished | RunnerStatus::Aborted => Ok(TickStatus::Finished),
            RunnerStatus::Idle | RunnerStatus::Running { .. } => Ok(TickStatus::Running),
        }
    }

    fn report(&self, telemetry: &mut dyn TelemetrySink, now_ms: u64) {
        match self.program {
            Program::SplitStick => {
                telemetry.add_data("Flywheel Velocity", &self.hw.flywheel.velocity());
                telemetry.add_data("Flywheel Power", &self.hw.flywheel.power());
            }
            Program::Keyboard | Program::Gamepad => {
                telemetry.add_data("Shooting", &self.state.is_shooting);
            }
            Program::Script { .. } => {
                let Some(runner) = self.runner.as_ref() else {
                    return;
                };
                if let (Some(AutoStep::Shoot(ShootBound::Duration { .. })), Some(elapsed)) =
                    (runner.current_step(), runner.step_elapsed_ms(now_ms))
                {
                    telemetry.add_data("Launcher Countdown", &(elapsed as f32 / 1000.0));
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod mock;

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;
    use starterbot_core::autonomous::StepOutcome;
    use starterbot_core::traits::{Axis, MockTime};

    fn controller(config: RobotConfig) -> MockController {
        OpModeController::new(hardware(), config, MockTime::new()).unwrap()
    }

    #[test]
    fn test_tick_before_start() {
        let mut ctl = controller(RobotConfig::default());
        let mut input = ScriptedInput::default();
        let mut telemetry = Recorder::default();

        assert_eq!(
            ctl.tick(&mut input, &mut telemetry, true),
            Err(ControlError::NotStarted)
        );
    }

    #[test]
    fn test_stop_during_init() {
        let mut ctl = controller(RobotConfig::default());
        let mut input = ScriptedInput::default();
        let mut telemetry = Recorder::default();
        ctl.init_tick(&mut input, &mut telemetry).unwrap();

        assert_eq!(
            ctl.tick(&mut input, &mut telemetry, false),
            Ok(TickStatus::Stopped)
        );
        assert!(ctl.state().is_safe(0.2));
        assert_eq!(ctl.start(&mut telemetry), Err(ControlError::Stopped));
    }

    #[test]
    fn test_start_after_stop_keeps_robot_still() {
        let mut ctl = controller(RobotConfig::match_program());
        let mut input = ScriptedInput::default();
        let mut telemetry = Recorder::default();
        ctl.init_tick(&mut input, &mut telemetry).unwrap();
        ctl.stop().unwrap();

        assert_eq!(ctl.start(&mut telemetry), Err(ControlError::Stopped));
        input.set_axis(Axis::LeftStickY, -1.0);
        assert_eq!(
            ctl.tick(&mut input, &mut telemetry, true),
            Ok(TickStatus::Stopped)
        );
        assert_eq!(ctl.hardware().left_drive.power, 0.0);
        assert_eq!(ctl.hardware().right_drive.power, 0.0);
    }

    #[test]
    fn test_init_cycles_on_home_edges() {
        let mut ctl = controller(RobotConfig::match_program());
        let mut input = ScriptedInput::default();
        let mut telemetry = Recorder::default();

        assert_eq!(ctl.init_tick(&mut input, &mut telemetry), Ok(OperatingMode::TeleOp));
        input.press(Button::Home);
        assert_eq!(ctl.init_tick(&mut input, &mut telemetry), Ok(OperatingMode::AutoBlue));
        // Held button is not a new edge
        assert_eq!(ctl.init_tick(&mut input, &mut telemetry), Ok(OperatingMode::AutoBlue));
        assert!(telemetry.lines.iter().any(|l| l == "Please remember to enable the AUTO timer!"));
        assert_eq!(ctl.hardware().gate.position, 0.2);
    }

    #[test]
    fn test_keyboard_drive_and_shot() {
        let mut ctl = controller(RobotConfig::drive_program(OperatingMode::Keyboard));
        let mut input = ScriptedInput::default();
        let mut telemetry = Recorder::default();
        ctl.start(&mut telemetry).unwrap();

        input.press(Button::Key(b'i'));
        input.press(Button::Key(b'l'));
        assert_eq!(ctl.tick(&mut input, &mut telemetry, true), Ok(TickStatus::Running));
        // Forward plus right turn saturates the left side and parks the right
        assert_eq!(ctl.hardware().left_drive.power, 1.0);
        assert_eq!(ctl.hardware().right_drive.power, 0.0);

        input.press(Button::Key(b'p'));
        ctl.tick(&mut input, &mut telemetry, true).unwrap();
        assert!(ctl.state().is_shooting);
        assert_eq!(ctl.hardware().left_drive.power, 0.0);

        // Driving is ignored while shooting
        ctl.time().advance_ms(100);
        ctl.tick(&mut input, &mut telemetry, true).unwrap();
        assert_eq!(ctl.hardware().left_drive.power, 0.0);

        input.release(Button::Key(b'p'));
        ctl.time().advance_ms(1850);
        ctl.tick(&mut input, &mut telemetry, true).unwrap();
        assert!(!ctl.state().is_shooting);
        assert_eq!(ctl.hardware().left_drive.power, 1.0);
    }

    #[test]
    fn test_gamepad_stick_up_drives_forward() {
        let mut ctl = controller(RobotConfig::drive_program(OperatingMode::Gamepad));
        let mut input = ScriptedInput::default();
        let mut telemetry = Recorder::default();
        ctl.start(&mut telemetry).unwrap();

        input.set_axis(Axis::LeftStickY, -0.5);
        ctl.tick(&mut input, &mut telemetry, true).unwrap();
        assert_eq!(ctl.state().drive_left, 0.5);
        assert_eq!(ctl.state().drive_right, 0.5);
    }

    #[test]
    fn test_stop_mid_shot_forces_safe_state() {
        let mut ctl = controller(RobotConfig::drive_program(OperatingMode::Gamepad));
        let mut input = ScriptedInput::default();
        let mut telemetry = Recorder::default();
        ctl.start(&mut telemetry).unwrap();

        input.press(Button::Cross);
        ctl.tick(&mut input, &mut telemetry, true).unwrap();
        assert!(ctl.state().is_shooting);

        ctl.time().advance_ms(50);
        assert_eq!(ctl.tick(&mut input, &mut telemetry, false), Ok(TickStatus::Stopped));
        assert!(ctl.state().is_safe(0.2));
        assert_eq!(ctl.hardware().gate.position, 0.2);
        assert_eq!(ctl.hardware().flywheel.power, 0.0);

        // Further ticks do nothing
        assert_eq!(ctl.tick(&mut input, &mut telemetry, true), Ok(TickStatus::Stopped));
    }

    #[test]
    fn test_actuator_failure_forces_safe_state() {
        let mut ctl = controller(RobotConfig::match_program());
        let mut input = ScriptedInput::default();
        let mut telemetry = Recorder::default();
        ctl.start(&mut telemetry).unwrap();

        input.press(Button::RightBumper);
        input.press(Button::Cross);
        ctl.hw.flywheel.measured_velocity = 1300.0;
        ctl.tick(&mut input, &mut telemetry, true).unwrap();
        assert_eq!(ctl.hardware().feeder.power, 0.5);

        ctl.hw.agitator.fail = true;
        assert_eq!(
            ctl.tick(&mut input, &mut telemetry, true),
            Err(ControlError::Actuator(ActuatorError::HardwareFault))
        );
        assert_eq!(ctl.hardware().feeder.power, 0.0);
        assert_eq!(ctl.hardware().flywheel.velocity_setpoint, 0.0);
        assert_eq!(ctl.hardware().gate.position, 0.2);
    }

    #[test]
    fn test_auto_red_runs_mirrored_script_then_finishes() {
        let mut ctl = controller(RobotConfig::match_program());
        let mut input = ScriptedInput::default();
        let mut telemetry = Recorder::default();

        input.press(Button::Home);
        ctl.init_tick(&mut input, &mut telemetry).unwrap();
        input.release(Button::Home);
        ctl.init_tick(&mut input, &mut telemetry).unwrap();
        input.press(Button::Home);
        assert_eq!(ctl.init_tick(&mut input, &mut telemetry), Ok(OperatingMode::AutoRed));

        assert_eq!(ctl.start(&mut telemetry), Ok(OperatingMode::AutoRed));
        assert!(telemetry.has_data("RUNNING OPMODE"));

        // Continuous shooting for ten seconds
        ctl.hw.flywheel.measured_velocity = 1300.0;
        ctl.tick(&mut input, &mut telemetry, true).unwrap();
        assert_eq!(ctl.hardware().feeder.power, 1.0);
        assert!(telemetry.has_data("Launcher Countdown"));

        ctl.time().advance_ms(10_000);
        ctl.tick(&mut input, &mut telemetry, true).unwrap();
        assert_eq!(ctl.hardware().flywheel.velocity_setpoint, 0.0);
        // First encoder move issued in the same tick
        assert_eq!(ctl.hardware().left_drive.target, -534);

        ctl.hw.left_drive.busy = false;
        ctl.hw.right_drive.busy = false;
        ctl.tick(&mut input, &mut telemetry, true).unwrap();
        // Red turns the other way; mock encoders never move
        assert_eq!(ctl.hardware().left_drive.target, 356);
        assert_eq!(ctl.hardware().right_drive.target, -356);

        ctl.hw.left_drive.busy = false;
        ctl.hw.right_drive.busy = false;
        ctl.tick(&mut input, &mut telemetry, true).unwrap();

        ctl.time().advance_ms(5_000);
        assert_eq!(ctl.tick(&mut input, &mut telemetry, true), Ok(TickStatus::Finished));
        assert_eq!(
            ctl.runner().map(|r| r.outcomes().to_vec()),
            Some(vec![
                StepOutcome::Completed,
                StepOutcome::Completed,
                StepOutcome::Completed,
                StepOutcome::TimedOut,
            ])
        );
        assert!(ctl.state().is_safe(0.2));
        assert_eq!(ctl.tick(&mut input, &mut telemetry, true), Ok(TickStatus::Finished));
    }

    #[test]
    fn test_timed_autonomous_hands_over_to_keyboard() {
        let mut ctl = controller(RobotConfig::drive_program(OperatingMode::Autonomous));
        let mut input = ScriptedInput::default();
        let mut telemetry = Recorder::default();
        ctl.start(&mut telemetry).unwrap();

        let mut status = TickStatus::Running;
        for _ in 0..2_000 {
            ctl.time().advance_ms(20);
            status = ctl.tick(&mut input, &mut telemetry, true).unwrap();
        }
        assert_eq!(status, TickStatus::Running);
        assert_eq!(ctl.runner().map(|r| r.status()), Some(RunnerStatus::Finished));

        input.press(Button::Key(b'i'));
        ctl.tick(&mut input, &mut telemetry, true).unwrap();
        assert_eq!(ctl.hardware().left_drive.power, 1.0);
    }
}
