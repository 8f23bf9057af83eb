//! Autonomous script runner
//!
//! Executes an [`AutoScript`] one step at a time from the control loop tick.
//! Nothing blocks: every duration, timeout and shot is a timed transition
//! checked against the `now_ms` passed to [`AutonomousRunner::update`].
//!
//! A step that finishes during a tick is cleaned up and the next step starts
//! in that same tick, so zero-length steps never cost a loop iteration.
//!
//! Every drive step leaves the motors zeroed and back in open-loop mode.

use heapless::Vec;
use libm::fabsf;
use log::{debug, warn};

use super::script::{AutoScript, MAX_STEPS};
use super::step::{AutoStep, ShootBound};
use crate::hardware::Hardware;
use crate::parameters::{FeederParams, ShooterParams};
use crate::shooter::{FeederGate, ShotSequencer};
use crate::state::RobotState;
use crate::traits::{
    ActuatorError, EncoderActuator, GateServo, PowerActuator, RunMode, VelocityActuator,
};

/// How a step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step reached its goal
    Completed,
    /// Encoder drive hit its timeout before both sides settled
    TimedOut,
    /// Runner was aborted during the step
    Aborted,
}

/// Runner lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunnerStatus {
    /// Not started
    #[default]
    Idle,
    /// Executing the step at `step`
    Running { step: usize },
    /// Every step has ended
    Finished,
    /// Stopped before the script ended
    Aborted,
}

/// Per-step progress
#[derive(Debug, Clone, Copy, PartialEq)]
enum StepProgress {
    /// Step at `index` has not issued any command yet
    Pending,
    /// Step started at `started_ms`
    Active { started_ms: u64, shots_left: u8 },
}

/// Sequential executor for autonomous scripts
pub struct AutonomousRunner {
    script: AutoScript,
    status: RunnerStatus,
    index: usize,
    progress: StepProgress,
    outcomes: Vec<StepOutcome, MAX_STEPS>,
    sequencer: ShotSequencer,
    feeder: FeederGate,
}

impl AutonomousRunner {
    pub fn new(script: AutoScript, shooter: &ShooterParams, feeder: &FeederParams) -> Self {
        Self {
            script,
            status: RunnerStatus::Idle,
            index: 0,
            progress: StepProgress::Pending,
            outcomes: Vec::new(),
            sequencer: ShotSequencer::new(shooter),
            feeder: FeederGate::new(feeder),
        }
    }

    pub fn status(&self) -> RunnerStatus {
        self.status
    }

    /// Script being executed.
    pub fn script(&self) -> &AutoScript {
        &self.script
    }

    /// Outcome of every step that has ended, in order.
    pub fn outcomes(&self) -> &[StepOutcome] {
        &self.outcomes
    }

    /// Step currently executing.
    pub fn current_step(&self) -> Option<&AutoStep> {
        match self.status {
            RunnerStatus::Running { step } => self.script.get(step),
            _ => None,
        }
    }

    /// Time spent in the current step.
    pub fn step_elapsed_ms(&self, now_ms: u64) -> Option<u64> {
        match (self.status, self.progress) {
            (RunnerStatus::Running { .. }, StepProgress::Active { started_ms, .. }) => {
                Some(now_ms.saturating_sub(started_ms))
            }
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, RunnerStatus::Finished | RunnerStatus::Aborted)
    }

    /// Begin at the first step. The first command goes out on the next
    /// [`update`](Self::update).
    pub fn start(&mut self) {
        self.index = 0;
        self.progress = StepProgress::Pending;
        self.outcomes.clear();
        self.status = if self.script.is_empty() {
            RunnerStatus::Finished
        } else {
            RunnerStatus::Running { step: 0 }
        };
    }

    /// Runner tick.
    pub fn update<D, F, P, G>(
        &mut self,
        hw: &mut Hardware<D, F, P, G>,
        state: &mut RobotState,
        now_ms: u64,
    ) -> Result<RunnerStatus, ActuatorError>
    where
        D: EncoderActuator,
        F: VelocityActuator,
        P: PowerActuator,
        G: GateServo,
    {
        while let RunnerStatus::Running { step } = self.status {
            let Some(current) = self.script.get(step).copied() else {
                self.status = RunnerStatus::Finished;
                break;
            };

            if self.progress == StepProgress::Pending {
                self.begin_step(&current, hw, state, now_ms)?;
            }

            match self.evaluate(&current, hw, state, now_ms)? {
                Some(outcome) => self.end_step(&current, outcome, hw, state)?,
                None => break,
            }
        }

        Ok(self.status)
    }

    /// Stop mid-script: the current step is recorded as aborted, its
    /// actuators are released and no further steps run.
    pub fn abort<D, F, P, G>(
        &mut self,
        hw: &mut Hardware<D, F, P, G>,
        state: &mut RobotState,
    ) -> Result<(), ActuatorError>
    where
        D: EncoderActuator,
        F: VelocityActuator,
        P: PowerActuator,
        G: GateServo,
    {
        let RunnerStatus::Running { step } = self.status else {
            return Ok(());
        };

        let current = self.script.get(step).copied();
        self.status = RunnerStatus::Aborted;
        self.progress = StepProgress::Pending;
        self.outcomes.push(StepOutcome::Aborted).ok();
        debug!("autonomous aborted at step {}", step);

        match current {
            Some(step) => self.release(&step, hw, state),
            None => Ok(()),
        }
    }

    fn begin_step<D, F, P, G>(
        &mut self,
        step: &AutoStep,
        hw: &mut Hardware<D, F, P, G>,
        state: &mut RobotState,
        now_ms: u64,
    ) -> Result<(), ActuatorError>
    where
        D: EncoderActuator,
        F: VelocityActuator,
        P: PowerActuator,
        G: GateServo,
    {
        let mut shots_left = 0;
        match *step {
            AutoStep::TimedDrive { left, right, .. } => {
                hw.drive(state, left, right)?;
            }
            AutoStep::EncoderDrive {
                speed,
                left_ticks,
                right_ticks,
                ..
            } => {
                let left_target = hw.left_drive.current_position().saturating_add(left_ticks);
                let right_target =
                    hw.right_drive.current_position().saturating_add(right_ticks);
                hw.left_drive.set_target_position(left_target)?;
                hw.right_drive.set_target_position(right_target)?;
                hw.set_drive_mode(RunMode::ToPosition)?;
                let power = fabsf(speed);
                hw.drive(state, power, power)?;
            }
            AutoStep::Wait { .. } => {}
            AutoStep::Shoot(ShootBound::Count(n)) => shots_left = n,
            AutoStep::Shoot(ShootBound::Duration { .. }) => {}
        }

        self.progress = StepProgress::Active {
            started_ms: now_ms,
            shots_left,
        };
        Ok(())
    }

    /// Returns the outcome once the step has ended.
    fn evaluate<D, F, P, G>(
        &mut self,
        step: &AutoStep,
        hw: &mut Hardware<D, F, P, G>,
        state: &mut RobotState,
        now_ms: u64,
    ) -> Result<Option<StepOutcome>, ActuatorError>
    where
        D: EncoderActuator,
        F: VelocityActuator,
        P: PowerActuator,
        G: GateServo,
    {
        let StepProgress::Active {
            started_ms,
            shots_left,
        } = self.progress
        else {
            return Ok(None);
        };
        let elapsed = now_ms.saturating_sub(started_ms);

        let outcome = match *step {
            AutoStep::TimedDrive { duration_ms, .. } | AutoStep::Wait { duration_ms } => {
                (elapsed >= u64::from(duration_ms)).then_some(StepOutcome::Completed)
            }
            AutoStep::EncoderDrive { timeout_ms, .. } => {
                if !hw.left_drive.is_busy() && !hw.right_drive.is_busy() {
                    Some(StepOutcome::Completed)
                } else if elapsed >= u64::from(timeout_ms) {
                    warn!(
                        "encoder drive step {} timed out after {} ms",
                        self.index, timeout_ms
                    );
                    Some(StepOutcome::TimedOut)
                } else {
                    None
                }
            }
            AutoStep::Shoot(ShootBound::Count(_)) => {
                self.sequencer.update(hw, state, now_ms)?;
                if self.sequencer.is_active() {
                    None
                } else if shots_left == 0 {
                    Some(StepOutcome::Completed)
                } else {
                    self.sequencer.trigger(hw, state, now_ms)?;
                    self.progress = StepProgress::Active {
                        started_ms,
                        shots_left: shots_left - 1,
                    };
                    None
                }
            }
            AutoStep::Shoot(ShootBound::Duration { ms, target }) => {
                if elapsed >= u64::from(ms) {
                    Some(StepOutcome::Completed)
                } else {
                    self.feeder.feed(hw, state, target)?;
                    None
                }
            }
        };

        Ok(outcome)
    }

    fn end_step<D, F, P, G>(
        &mut self,
        step: &AutoStep,
        outcome: StepOutcome,
        hw: &mut Hardware<D, F, P, G>,
        state: &mut RobotState,
    ) -> Result<(), ActuatorError>
    where
        D: EncoderActuator,
        F: VelocityActuator,
        P: PowerActuator,
        G: GateServo,
    {
        self.outcomes.push(outcome).ok();
        debug!("autonomous step {} ended: {:?}", self.index, outcome);

        self.index += 1;
        self.progress = StepProgress::Pending;
        self.status = if self.index < self.script.len() {
            RunnerStatus::Running { step: self.index }
        } else {
            RunnerStatus::Finished
        };

        self.release(step, hw, state)
    }

    /// Put the actuators a step used back at rest.
    fn release<D, F, P, G>(
        &mut self,
        step: &AutoStep,
        hw: &mut Hardware<D, F, P, G>,
        state: &mut RobotState,
    ) -> Result<(), ActuatorError>
    where
        D: EncoderActuator,
        F: VelocityActuator,
        P: PowerActuator,
        G: GateServo,
    {
        match step {
            AutoStep::TimedDrive { .. } => hw.stop_drive(state),
            AutoStep::EncoderDrive { .. } => {
                let stopped = hw.stop_drive(state);
                hw.set_drive_mode(RunMode::WithoutEncoder)?;
                stopped
            }
            AutoStep::Wait { .. } => Ok(()),
            AutoStep::Shoot(ShootBound::Count(_)) => self.sequencer.abort(hw, state),
            AutoStep::Shoot(ShootBound::Duration { .. }) => self.feeder.stop(hw, state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::mock::{hardware, MockHardware};
    use crate::mode::OperatingMode;
    use crate::parameters::AutoParams;
    use crate::shooter::ShotPreset;

    fn runner(steps: &[AutoStep]) -> (AutonomousRunner, MockHardware, RobotState) {
        let script = AutoScript::from_steps(steps).unwrap();
        let mut runner =
            AutonomousRunner::new(script, &ShooterParams::default(), &FeederParams::default());
        runner.start();
        (
            runner,
            hardware(),
            RobotState::new(OperatingMode::AutoBlue, 0.2),
        )
    }

    #[test]
    fn test_empty_script_finishes_on_start() {
        let (runner, _, _) = runner(&[]);
        assert_eq!(runner.status(), RunnerStatus::Finished);
    }

    #[test]
    fn test_not_started_does_nothing() {
        let script = AutoScript::from_steps(&[AutoStep::timed_drive(1.0, 1.0, 100)]).unwrap();
        let mut runner =
            AutonomousRunner::new(script, &ShooterParams::default(), &FeederParams::default());
        let mut hw = hardware();
        let mut state = RobotState::new(OperatingMode::Autonomous, 0.2);

        assert_eq!(runner.update(&mut hw, &mut state, 0), Ok(RunnerStatus::Idle));
        assert_eq!(hw.left_drive.power, 0.0);
    }

    #[test]
    fn test_timed_drive_then_wait() {
        let (mut runner, mut hw, mut state) = runner(&[
            AutoStep::timed_drive(1.0, 1.0, 1200),
            AutoStep::wait(500),
        ]);

        runner.update(&mut hw, &mut state, 0).unwrap();
        assert_eq!(hw.left_drive.power, 1.0);
        assert_eq!(state.drive_right, 1.0);

        runner.update(&mut hw, &mut state, 1199).unwrap();
        assert_eq!(runner.status(), RunnerStatus::Running { step: 0 });

        runner.update(&mut hw, &mut state, 1200).unwrap();
        assert_eq!(runner.status(), RunnerStatus::Running { step: 1 });
        assert_eq!(hw.left_drive.power, 0.0);

        assert_eq!(
            runner.update(&mut hw, &mut state, 1700),
            Ok(RunnerStatus::Finished)
        );
        assert_eq!(
            runner.outcomes(),
            &[StepOutcome::Completed, StepOutcome::Completed]
        );
    }

    #[test]
    fn test_encoder_drive_targets_and_completion() {
        let (mut runner, mut hw, mut state) =
            runner(&[AutoStep::encoder_drive(-0.5, -534, -534, 5000)]);
        hw.left_drive.position = 100;
        hw.right_drive.position = 200;

        runner.update(&mut hw, &mut state, 0).unwrap();
        assert_eq!(hw.left_drive.target, -434);
        assert_eq!(hw.right_drive.target, -334);
        assert_eq!(hw.left_drive.mode, RunMode::ToPosition);
        // Power is always the magnitude of the speed
        assert_eq!(hw.left_drive.power, 0.5);

        runner.update(&mut hw, &mut state, 1000).unwrap();
        assert_eq!(runner.status(), RunnerStatus::Running { step: 0 });

        hw.left_drive.busy = false;
        runner.update(&mut hw, &mut state, 1100).unwrap();
        assert_eq!(runner.status(), RunnerStatus::Running { step: 0 });

        hw.right_drive.busy = false;
        assert_eq!(
            runner.update(&mut hw, &mut state, 1200),
            Ok(RunnerStatus::Finished)
        );
        assert_eq!(hw.left_drive.power, 0.0);
        assert_eq!(hw.right_drive.mode, RunMode::WithoutEncoder);
        assert_eq!(runner.outcomes(), &[StepOutcome::Completed]);
    }

    #[test]
    fn test_encoder_drive_timeout() {
        let (mut runner, mut hw, mut state) = runner(&[
            AutoStep::encoder_drive(1.0, -2228, -2228, 5000),
            AutoStep::wait(100),
        ]);

        runner.update(&mut hw, &mut state, 0).unwrap();
        runner.update(&mut hw, &mut state, 4999).unwrap();
        assert_eq!(runner.status(), RunnerStatus::Running { step: 0 });

        runner.update(&mut hw, &mut state, 5000).unwrap();
        assert_eq!(runner.status(), RunnerStatus::Running { step: 1 });
        assert_eq!(runner.outcomes(), &[StepOutcome::TimedOut]);
        assert_eq!(hw.left_drive.power, 0.0);
        assert_eq!(hw.left_drive.mode, RunMode::WithoutEncoder);
    }

    #[test]
    fn test_encoder_drive_zero_timeout_ends_same_tick() {
        let (mut runner, mut hw, mut state) =
            runner(&[AutoStep::encoder_drive(0.5, 500, 500, 0)]);

        assert_eq!(
            runner.update(&mut hw, &mut state, 0),
            Ok(RunnerStatus::Finished)
        );
        assert_eq!(runner.outcomes(), &[StepOutcome::TimedOut]);
        assert_eq!(hw.left_drive.power, 0.0);
        assert_eq!(hw.right_drive.power, 0.0);
        assert_eq!(hw.left_drive.mode, RunMode::WithoutEncoder);
        assert_eq!(hw.right_drive.mode, RunMode::WithoutEncoder);
        assert_eq!(state.drive_left, 0.0);
    }

    #[test]
    fn test_shoot_count_runs_sequences_back_to_back() {
        let (mut runner, mut hw, mut state) = runner(&[AutoStep::shoot(ShootBound::Count(2))]);

        runner.update(&mut hw, &mut state, 0).unwrap();
        assert!(state.is_shooting);
        assert_eq!(hw.gate.position, 0.0);

        runner.update(&mut hw, &mut state, 1950).unwrap();
        // Second shot starts as soon as the first settles
        assert!(state.is_shooting);
        assert_eq!(hw.gate.position, 0.0);

        runner.update(&mut hw, &mut state, 3899).unwrap();
        assert_eq!(runner.status(), RunnerStatus::Running { step: 0 });

        assert_eq!(
            runner.update(&mut hw, &mut state, 3900),
            Ok(RunnerStatus::Finished)
        );
        assert!(!state.is_shooting);
    }

    #[test]
    fn test_shoot_duration_gates_on_velocity() {
        let bound = AutoParams::default().shoot_bound(&FeederParams::default());
        let (mut runner, mut hw, mut state) = runner(&[AutoStep::shoot(bound)]);

        hw.flywheel.measured_velocity = 1100.0;
        runner.update(&mut hw, &mut state, 0).unwrap();
        assert_eq!(hw.flywheel.velocity_setpoint, 1300.0);
        assert_eq!(hw.feeder.power, 0.0);

        // Autonomous bank tolerance is 100
        hw.flywheel.measured_velocity = 1200.0;
        runner.update(&mut hw, &mut state, 2000).unwrap();
        assert_eq!(hw.feeder.power, 1.0);

        assert_eq!(
            runner.update(&mut hw, &mut state, 10_000),
            Ok(RunnerStatus::Finished)
        );
        assert_eq!(hw.flywheel.velocity_setpoint, 0.0);
        assert_eq!(hw.feeder.power, 0.0);
        assert_eq!(hw.agitator.power, 0.0);
    }

    #[test]
    fn test_zero_length_steps_chain_in_one_tick() {
        let target = FeederParams::default().target(ShotPreset::Bank);
        let (mut runner, mut hw, mut state) = runner(&[
            AutoStep::wait(0),
            AutoStep::shoot(ShootBound::Duration { ms: 0, target }),
            AutoStep::shoot(ShootBound::Count(0)),
            AutoStep::timed_drive(0.5, 0.5, 300),
        ]);

        runner.update(&mut hw, &mut state, 0).unwrap();
        assert_eq!(runner.status(), RunnerStatus::Running { step: 3 });
        assert_eq!(hw.left_drive.power, 0.5);
    }

    #[test]
    fn test_abort_mid_shot_and_drive() {
        let (mut runner, mut hw, mut state) = runner(&[
            AutoStep::shoot(ShootBound::Count(3)),
            AutoStep::encoder_drive(0.5, 500, 500, 5000),
        ]);
        runner.update(&mut hw, &mut state, 0).unwrap();
        assert!(state.is_shooting);

        runner.abort(&mut hw, &mut state).unwrap();
        assert_eq!(runner.status(), RunnerStatus::Aborted);
        assert!(!state.is_shooting);
        assert_eq!(hw.gate.position, 0.2);
        assert_eq!(runner.outcomes(), &[StepOutcome::Aborted]);

        // Nothing runs after abort
        assert_eq!(
            runner.update(&mut hw, &mut state, 10_000),
            Ok(RunnerStatus::Aborted)
        );
        assert_eq!(hw.left_drive.mode, RunMode::WithoutEncoder);
    }

    #[test]
    fn test_abort_encoder_drive_restores_mode() {
        let (mut runner, mut hw, mut state) =
            runner(&[AutoStep::encoder_drive(0.5, 500, 500, 5000)]);
        runner.update(&mut hw, &mut state, 0).unwrap();
        assert_eq!(hw.left_drive.mode, RunMode::ToPosition);

        runner.abort(&mut hw, &mut state).unwrap();
        assert_eq!(hw.left_drive.mode, RunMode::WithoutEncoder);
        assert_eq!(hw.left_drive.power, 0.0);
        assert!(runner.is_finished());
    }

    #[test]
    fn test_step_elapsed() {
        let (mut runner, mut hw, mut state) = runner(&[AutoStep::wait(1000)]);
        assert_eq!(runner.step_elapsed_ms(0), None);
        runner.update(&mut hw, &mut state, 100).unwrap();
        assert_eq!(runner.step_elapsed_ms(600), Some(500));
        assert_eq!(runner.current_step(), Some(&AutoStep::wait(1000)));
    }
}
