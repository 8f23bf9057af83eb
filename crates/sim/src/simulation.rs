//! Whole-op-mode simulation
//!
//! Plays the host runtime's role: advances the clock and motor physics by a
//! fixed tick, then calls the controller exactly as the robot's loop would.

use starterbot::{OpModeController, RobotConfig, TickStatus};
use starterbot_core::mode::OperatingMode;
use starterbot_core::state::RobotState;
use starterbot_core::traits::{Button, TimeSource};

use crate::clock::SimClock;
use crate::error::SimError;
use crate::hardware_map::SimHardwareMap;
use crate::input::SimInput;
use crate::motor::SimMotor;
use crate::servo::SimServo;
use crate::telemetry::TelemetryRecorder;

/// Controller wired to simulated devices
pub type SimController = OpModeController<SimMotor, SimMotor, SimMotor, SimServo, SimClock>;

/// Default loop period (ms)
pub const DEFAULT_TICK_MS: u64 = 20;

pub struct Simulation {
    controller: SimController,
    map: SimHardwareMap,
    clock: SimClock,
    input: SimInput,
    telemetry: TelemetryRecorder,
    tick_ms: u64,
}

impl Simulation {
    /// Simulate the starter bot with every configured device present.
    pub fn new(config: RobotConfig) -> Result<Self, SimError> {
        let map = SimHardwareMap::starter_bot(&config.devices, &config.directions)?;
        Self::with_map(map, config)
    }

    /// Simulate against a caller-built device map.
    pub fn with_map(mut map: SimHardwareMap, config: RobotConfig) -> Result<Self, SimError> {
        let clock = SimClock::new();
        let controller = OpModeController::from_map(&mut map, config, clock.clone())?;
        Ok(Self {
            controller,
            map,
            clock,
            input: SimInput::new(),
            telemetry: TelemetryRecorder::new(),
            tick_ms: DEFAULT_TICK_MS,
        })
    }

    /// Use a different loop period.
    pub fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms.max(1);
        self
    }

    pub fn controller(&self) -> &SimController {
        &self.controller
    }

    pub fn state(&self) -> &RobotState {
        self.controller.state()
    }

    pub fn map(&self) -> &SimHardwareMap {
        &self.map
    }

    pub fn input(&mut self) -> &mut SimInput {
        &mut self.input
    }

    pub fn telemetry(&self) -> &TelemetryRecorder {
        &self.telemetry
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Simulated motor by configured name.
    pub fn motor(&self, name: &str) -> Option<SimMotor> {
        self.map.motor(name)
    }

    /// One init-phase loop iteration.
    pub fn init_step(&mut self) -> Result<OperatingMode, SimError> {
        self.advance();
        Ok(self
            .controller
            .init_tick(&mut self.input, &mut self.telemetry)?)
    }

    /// Cycle the selector `presses` times with distinct Home presses.
    pub fn select(&mut self, presses: usize) -> Result<OperatingMode, SimError> {
        let mut mode = self.init_step()?;
        for _ in 0..presses {
            self.input.press(Button::Home);
            self.init_step()?;
            self.input.release(Button::Home);
            mode = self.init_step()?;
        }
        Ok(mode)
    }

    /// Start signal.
    pub fn start(&mut self) -> Result<OperatingMode, SimError> {
        Ok(self.controller.start(&mut self.telemetry)?)
    }

    /// One active loop iteration.
    pub fn step(&mut self) -> Result<TickStatus, SimError> {
        self.advance();
        Ok(self
            .controller
            .tick(&mut self.input, &mut self.telemetry, true)?)
    }

    /// Drop the run signal.
    pub fn stop(&mut self) -> Result<TickStatus, SimError> {
        Ok(self
            .controller
            .tick(&mut self.input, &mut self.telemetry, false)?)
    }

    /// Run for `duration_ms` or until the program stops running.
    pub fn run_for(&mut self, duration_ms: u64) -> Result<TickStatus, SimError> {
        let until = self.now_ms() + duration_ms;
        let mut status = TickStatus::Running;
        while self.now_ms() < until {
            status = self.step()?;
            if status != TickStatus::Running {
                break;
            }
        }
        Ok(status)
    }

    /// Step until `done` holds, failing after `max_ms`.
    pub fn run_until(
        &mut self,
        what: &'static str,
        max_ms: u64,
        mut done: impl FnMut(&Self) -> bool,
    ) -> Result<TickStatus, SimError> {
        let started = self.now_ms();
        loop {
            let status = self.step()?;
            if done(self) {
                return Ok(status);
            }
            let waited_ms = self.now_ms() - started;
            if waited_ms >= max_ms {
                return Err(SimError::Timeout { what, waited_ms });
            }
        }
    }

    fn advance(&mut self) {
        self.clock.advance_ms(self.tick_ms);
        self.map.step(self.tick_ms);
    }
}
