//! Timed shot sequencer
//!
//! ```text
//! Idle --trigger--> GateOpen --open_ms--> GateClosing --close_ms--> Settling --settle_ms--> Idle
//! ```
//!
//! Entering `GateOpen` zeroes the drive, opens the gate and spins the
//! flywheel at shoot power. The gate closes when `GateClosing` starts, the
//! flywheel stops when `Settling` starts, and `is_shooting` clears on the
//! return to `Idle`.
//!
//! Each phase ends at an exact offset from the previous phase boundary, not
//! from the tick that observed it, so a coarse tick rate never stretches the
//! sequence. Several phases may complete within one `update`.

use crate::hardware::Hardware;
use crate::parameters::ShooterParams;
use crate::state::RobotState;
use crate::traits::{
    ActuatorError, ElapsedTimer, EncoderActuator, GateServo, PowerActuator, VelocityActuator,
};

/// Shot sequence phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShotPhase {
    #[default]
    Idle,
    GateOpen,
    GateClosing,
    Settling,
}

/// Single-flight timed shot state machine
#[derive(Debug, Clone)]
pub struct ShotSequencer {
    params: ShooterParams,
    phase: ShotPhase,
    /// Started at the boundary where the current phase began
    phase_timer: ElapsedTimer,
}

impl ShotSequencer {
    pub fn new(params: &ShooterParams) -> Self {
        Self {
            params: *params,
            phase: ShotPhase::Idle,
            phase_timer: ElapsedTimer::default(),
        }
    }

    pub fn phase(&self) -> ShotPhase {
        self.phase
    }

    /// True while a sequence is running.
    pub fn is_active(&self) -> bool {
        self.phase != ShotPhase::Idle
    }

    /// Start a shot at `now_ms`.
    ///
    /// Returns `Ok(false)` without touching any actuator if a shot is
    /// already in progress.
    pub fn trigger<D, F, P, G>(
        &mut self,
        hw: &mut Hardware<D, F, P, G>,
        state: &mut RobotState,
        now_ms: u64,
    ) -> Result<bool, ActuatorError>
    where
        D: EncoderActuator,
        F: VelocityActuator,
        P: PowerActuator,
        G: GateServo,
    {
        if self.is_active() {
            return Ok(false);
        }

        self.phase = ShotPhase::GateOpen;
        self.phase_timer.reset(now_ms);
        state.is_shooting = true;

        hw.drive(state, 0.0, 0.0)?;
        hw.gate(state, self.params.gate_open)?;
        hw.flywheel_power(state, self.params.shoot_power)?;
        Ok(true)
    }

    /// Advance through every phase boundary at or before `now_ms`.
    ///
    /// Keeps the drive at zero while the sequence stays active.
    pub fn update<D, F, P, G>(
        &mut self,
        hw: &mut Hardware<D, F, P, G>,
        state: &mut RobotState,
        now_ms: u64,
    ) -> Result<ShotPhase, ActuatorError>
    where
        D: EncoderActuator,
        F: VelocityActuator,
        P: PowerActuator,
        G: GateServo,
    {
        loop {
            let duration = match self.phase {
                ShotPhase::Idle => return Ok(ShotPhase::Idle),
                ShotPhase::GateOpen => self.params.open_ms,
                ShotPhase::GateClosing => self.params.close_ms,
                ShotPhase::Settling => self.params.settle_ms,
            };

            let duration = u64::from(duration);
            if self.phase_timer.elapsed_ms(now_ms) < duration {
                break;
            }

            match self.phase {
                ShotPhase::GateOpen => {
                    hw.gate(state, self.params.gate_closed)?;
                    self.phase = ShotPhase::GateClosing;
                }
                ShotPhase::GateClosing => {
                    hw.flywheel_power(state, 0.0)?;
                    self.phase = ShotPhase::Settling;
                }
                ShotPhase::Settling | ShotPhase::Idle => {
                    self.phase = ShotPhase::Idle;
                    state.is_shooting = false;
                }
            }
            let phase_end = self.phase_timer.started_ms() + duration;
            self.phase_timer.reset(phase_end);
        }

        hw.drive(state, 0.0, 0.0)?;
        Ok(self.phase)
    }

    /// Cancel any running sequence: gate closed, flywheel stopped.
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
        let was_active = self.is_active();
        self.reset(state);
        if was_active {
            hw.gate(state, self.params.gate_closed)?;
            hw.flywheel_power(state, 0.0)?;
        }
        Ok(())
    }

    /// Forget the running sequence without commanding any actuator.
    ///
    /// Used when the caller is about to force the safe state itself.
    pub fn reset(&mut self, state: &mut RobotState) {
        self.phase = ShotPhase::Idle;
        state.is_shooting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::mock::{hardware, MockHardware};
    use crate::mode::OperatingMode;

    fn setup() -> (ShotSequencer, MockHardware, RobotState) {
        let params = ShooterParams::default();
        (
            ShotSequencer::new(&params),
            hardware(),
            RobotState::new(OperatingMode::Keyboard, params.gate_closed),
        )
    }

    #[test]
    fn test_trigger_enters_gate_open() {
        let (mut seq, mut hw, mut state) = setup();
        hw.drive(&mut state, 1.0, 1.0).unwrap();

        assert_eq!(seq.trigger(&mut hw, &mut state, 100), Ok(true));
        assert_eq!(seq.phase(), ShotPhase::GateOpen);
        assert!(state.is_shooting);
        assert_eq!(hw.left_drive.power, 0.0);
        assert_eq!(hw.gate.position, 0.0);
        assert!((hw.flywheel.power - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_phase_timing() {
        let (mut seq, mut hw, mut state) = setup();
        seq.trigger(&mut hw, &mut state, 0).unwrap();

        assert_eq!(seq.update(&mut hw, &mut state, 249), Ok(ShotPhase::GateOpen));
        assert_eq!(seq.update(&mut hw, &mut state, 250), Ok(ShotPhase::GateClosing));
        assert!((hw.gate.position - 0.2).abs() < 0.001);
        assert!((hw.flywheel.power - 0.8).abs() < 0.001);

        assert_eq!(seq.update(&mut hw, &mut state, 449), Ok(ShotPhase::GateClosing));
        assert_eq!(seq.update(&mut hw, &mut state, 450), Ok(ShotPhase::Settling));
        assert_eq!(hw.flywheel.power, 0.0);
        assert!(state.is_shooting);
    }

    #[test]
    fn test_idle_to_idle_takes_exactly_1950ms() {
        let (mut seq, mut hw, mut state) = setup();
        seq.trigger(&mut hw, &mut state, 1_000).unwrap();

        let mut now = 1_000;
        while now < 1_000 + 1949 {
            now += 1;
            seq.update(&mut hw, &mut state, now).unwrap();
            if now < 1_000 + 1950 {
                assert!(seq.is_active(), "ended early at {}", now);
            }
        }
        assert!(state.is_shooting);

        assert_eq!(seq.update(&mut hw, &mut state, 2_950), Ok(ShotPhase::Idle));
        assert!(!state.is_shooting);
    }

    #[test]
    fn test_coarse_tick_crosses_several_phases() {
        let (mut seq, mut hw, mut state) = setup();
        seq.trigger(&mut hw, &mut state, 0).unwrap();

        // One late tick lands in Settling, whose end is still 1950
        assert_eq!(seq.update(&mut hw, &mut state, 1_000), Ok(ShotPhase::Settling));
        assert_eq!(hw.gate.position, 0.2);
        assert_eq!(hw.flywheel.power, 0.0);
        assert_eq!(seq.update(&mut hw, &mut state, 1_949), Ok(ShotPhase::Settling));
        assert_eq!(seq.update(&mut hw, &mut state, 1_950), Ok(ShotPhase::Idle));
    }

    #[test]
    fn test_trigger_while_shooting_is_noop() {
        let (mut seq, mut hw, mut state) = setup();
        seq.trigger(&mut hw, &mut state, 0).unwrap();
        seq.update(&mut hw, &mut state, 300).unwrap();

        assert_eq!(seq.trigger(&mut hw, &mut state, 310), Ok(false));
        assert_eq!(seq.phase(), ShotPhase::GateClosing);
        assert_eq!(hw.gate.position, 0.2);

        // Original schedule is kept
        assert_eq!(seq.update(&mut hw, &mut state, 1_950), Ok(ShotPhase::Idle));
    }

    #[test]
    fn test_drive_held_at_zero_while_shooting() {
        let (mut seq, mut hw, mut state) = setup();
        seq.trigger(&mut hw, &mut state, 0).unwrap();
        hw.drive(&mut state, 0.7, 0.7).unwrap();

        seq.update(&mut hw, &mut state, 10).unwrap();
        assert_eq!(state.drive_left, 0.0);
        assert_eq!(hw.right_drive.power, 0.0);
    }

    #[test]
    fn test_abort() {
        let (mut seq, mut hw, mut state) = setup();
        seq.trigger(&mut hw, &mut state, 0).unwrap();

        seq.abort(&mut hw, &mut state).unwrap();
        assert!(!seq.is_active());
        assert!(!state.is_shooting);
        assert_eq!(hw.gate.position, 0.2);
        assert_eq!(hw.flywheel.power, 0.0);

        // Fresh trigger is accepted after abort
        assert_eq!(seq.trigger(&mut hw, &mut state, 50), Ok(true));
    }

    #[test]
    fn test_custom_timing() {
        let params = ShooterParams {
            settle_ms: 500,
            ..ShooterParams::default()
        };
        let mut seq = ShotSequencer::new(&params);
        let mut hw = hardware();
        let mut state = RobotState::new(OperatingMode::Keyboard, 0.2);

        seq.trigger(&mut hw, &mut state, 0).unwrap();
        assert_eq!(seq.update(&mut hw, &mut state, 950), Ok(ShotPhase::Idle));
    }
}
