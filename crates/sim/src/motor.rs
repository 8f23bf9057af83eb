//! Simulated DC motor with encoder
//!
//! First-order velocity response toward the commanded velocity, integrated
//! into an encoder position. Run-to-position drives toward the target at the
//! commanded power and slows down over the last few hundred ticks, the way
//! a proportional position controller does.
//!
//! The model runs in the driver's frame, the one commands and encoder
//! readings use. The shaft turns the other way under [`Direction::Reverse`],
//! and the mounting decides which shaft direction moves the robot forward.

use std::cell::RefCell;
use std::rc::Rc;

use starterbot_core::traits::{
    check_power, ActuatorError, Direction, EncoderActuator, PowerActuator, RunMode,
    VelocityActuator,
};

/// Physical constants of a simulated motor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorConfig {
    /// Encoder velocity at full power (ticks/s)
    pub max_velocity: f32,
    /// Time to close ~63% of a velocity step (ms)
    pub time_constant_ms: f32,
    /// Distance from target below which run-to-position reports not busy
    pub position_tolerance: i32,
    /// Distance over which run-to-position slows down
    pub slowdown_ticks: f32,
}

impl MotorConfig {
    /// Drive motor: 28 counts/rev at 6000 rpm behind a 15:1 reduction
    pub const DRIVE: Self = Self {
        max_velocity: 2800.0,
        time_constant_ms: 60.0,
        position_tolerance: 10,
        slowdown_ticks: 200.0,
    };

    /// Flywheel motor: light load, slower spin-up
    pub const FLYWHEEL: Self = Self {
        max_velocity: 2800.0,
        time_constant_ms: 300.0,
        position_tolerance: 10,
        slowdown_ticks: 200.0,
    };

    /// Feeder, agitator and other open-loop actuators
    pub const AUXILIARY: Self = Self {
        max_velocity: 1000.0,
        time_constant_ms: 30.0,
        position_tolerance: 10,
        slowdown_ticks: 200.0,
    };
}

#[derive(Debug)]
struct MotorModel {
    config: MotorConfig,
    power: f32,
    /// Setpoint requested through `set_velocity`, if in velocity control
    velocity_setpoint: Option<f32>,
    velocity: f32,
    position: f64,
    target: i32,
    mode: RunMode,
    direction: Direction,
    /// Shaft direction that moves the mechanism forward
    mounting: Direction,
    fault: bool,
}

impl MotorModel {
    fn commanded_velocity(&self) -> f32 {
        match self.mode {
            RunMode::ToPosition => {
                let error = self.target as f32 - self.position as f32;
                if error.abs() <= self.config.position_tolerance as f32 {
                    return 0.0;
                }
                let scale = (error.abs() / self.config.slowdown_ticks).min(1.0);
                error.signum() * self.power.abs() * self.config.max_velocity * scale
            }
            RunMode::UsingEncoder | RunMode::WithoutEncoder => match self.velocity_setpoint {
                Some(v) => v.clamp(-self.config.max_velocity, self.config.max_velocity),
                None => self.power * self.config.max_velocity,
            },
        }
    }

    fn step(&mut self, dt_ms: u64) {
        let dt = dt_ms as f32;
        let alpha = (dt / self.config.time_constant_ms).min(1.0);
        self.velocity += (self.commanded_velocity() - self.velocity) * alpha;
        self.position += f64::from(self.velocity) * f64::from(dt) / 1000.0;
    }
}

/// Cloneable handle to one simulated motor
///
/// The controller owns one clone through its hardware bundle; the
/// simulation keeps another to advance physics and inspect state.
#[derive(Debug, Clone)]
pub struct SimMotor {
    model: Rc<RefCell<MotorModel>>,
}

impl SimMotor {
    pub fn new(config: MotorConfig) -> Self {
        Self::mounted(config, Direction::Forward)
    }

    /// Motor whose shaft must turn in `mounting` to move the mechanism
    /// forward. A mirror-mounted drive motor is `Direction::Reverse`.
    pub fn mounted(config: MotorConfig, mounting: Direction) -> Self {
        Self {
            model: Rc::new(RefCell::new(MotorModel {
                config,
                power: 0.0,
                velocity_setpoint: None,
                velocity: 0.0,
                position: 0.0,
                target: 0,
                mode: RunMode::WithoutEncoder,
                direction: Direction::Forward,
                mounting,
                fault: false,
            })),
        }
    }

    /// Advance physics by `dt_ms`.
    pub fn step(&self, dt_ms: u64) {
        self.model.borrow_mut().step(dt_ms);
    }

    /// Make every subsequent command fail with a hardware fault.
    pub fn inject_fault(&self, fault: bool) {
        self.model.borrow_mut().fault = fault;
    }

    /// Velocity setpoint, if under velocity control.
    pub fn velocity_setpoint(&self) -> Option<f32> {
        self.model.borrow().velocity_setpoint
    }

    pub fn target_position(&self) -> i32 {
        self.model.borrow().target
    }

    /// Overwrite the measured velocity (e.g. to model a shot dragging the
    /// flywheel down).
    pub fn set_measured_velocity(&self, ticks_per_sec: f32) {
        self.model.borrow_mut().velocity = ticks_per_sec;
    }

    /// Distance the mechanism has moved forward, in encoder ticks.
    ///
    /// Independent of the configured direction, so it shows whether a wheel
    /// actually pushed the robot forward.
    pub fn travel(&self) -> i32 {
        let m = self.model.borrow();
        let sign = f64::from(m.direction.sign() * m.mounting.sign());
        (m.position * sign).round() as i32
    }

    fn command(&self, f: impl FnOnce(&mut MotorModel)) -> Result<(), ActuatorError> {
        let mut model = self.model.borrow_mut();
        if model.fault {
            return Err(ActuatorError::HardwareFault);
        }
        f(&mut model);
        Ok(())
    }
}

impl PowerActuator for SimMotor {
    fn set_power(&mut self, power: f32) -> Result<(), ActuatorError> {
        let power = check_power(power)?;
        self.command(|m| {
            m.power = power;
            m.velocity_setpoint = None;
        })
    }

    fn power(&self) -> f32 {
        self.model.borrow().power
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), ActuatorError> {
        self.command(|m| {
            if m.direction != direction {
                // Shaft keeps turning the same way; the encoder flips sign
                m.position = -m.position;
                m.velocity = -m.velocity;
                m.direction = direction;
            }
        })
    }

    fn direction(&self) -> Direction {
        self.model.borrow().direction
    }
}

impl VelocityActuator for SimMotor {
    fn set_velocity(&mut self, ticks_per_sec: f32) -> Result<(), ActuatorError> {
        self.command(|m| {
            m.mode = RunMode::UsingEncoder;
            m.velocity_setpoint = Some(ticks_per_sec);
            m.power = (ticks_per_sec / m.config.max_velocity).clamp(-1.0, 1.0);
        })
    }

    fn velocity(&self) -> f32 {
        self.model.borrow().velocity
    }
}

impl EncoderActuator for SimMotor {
    fn current_position(&self) -> i32 {
        self.model.borrow().position.round() as i32
    }

    fn set_target_position(&mut self, ticks: i32) -> Result<(), ActuatorError> {
        self.command(|m| m.target = ticks)
    }

    fn set_run_mode(&mut self, mode: RunMode) -> Result<(), ActuatorError> {
        self.command(|m| {
            m.mode = mode;
            if mode == RunMode::WithoutEncoder {
                m.velocity_setpoint = None;
            }
        })
    }

    fn run_mode(&self) -> RunMode {
        self.model.borrow().mode
    }

    fn is_busy(&self) -> bool {
        let m = self.model.borrow();
        m.mode == RunMode::ToPosition
            && (m.target as f64 - m.position).abs() > f64::from(m.config.position_tolerance)
    }
}
