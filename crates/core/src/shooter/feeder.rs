//! Velocity-gated feeder
//!
//! The flywheel is commanded to a preset velocity and game pieces are fed
//! only while its measured velocity is within tolerance below the target.
//! The check is level-triggered and re-evaluated every tick, so feeding stops
//! as soon as a shot drags the flywheel below the threshold.

use crate::hardware::Hardware;
use crate::parameters::FeederParams;
use crate::state::RobotState;
use crate::traits::{ActuatorError, EncoderActuator, GateServo, PowerActuator, VelocityActuator};

/// True when the flywheel is fast enough to feed.
///
/// ```
/// use starterbot_core::shooter::should_feed;
///
/// assert!(should_feed(1250.0, 1300.0, 50.0));
/// assert!(!should_feed(1249.0, 1300.0, 50.0));
/// ```
#[inline]
pub fn should_feed(current: f32, target: f32, tolerance: f32) -> bool {
    current >= target - tolerance
}

/// Flywheel velocity presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotPreset {
    /// Close-range shot off the goal
    Bank,
    /// Medium/long-range shot
    Far,
    /// Maximum flywheel velocity
    Max,
}

/// Velocity setpoint with its feed tolerance (ticks/s)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedTarget {
    pub velocity: f32,
    pub tolerance: f32,
}

impl FeedTarget {
    /// Check a measured velocity against this target.
    pub fn is_reached(&self, current: f32) -> bool {
        should_feed(current, self.velocity, self.tolerance)
    }
}

/// Drives the flywheel, feeder and agitator for velocity-gated shots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeederGate {
    feed_power: f32,
    agitator_power: f32,
}

impl FeederGate {
    pub fn new(params: &FeederParams) -> Self {
        Self {
            feed_power: params.feed_power,
            agitator_power: params.agitator_power,
        }
    }

    /// One feeding tick toward `target`.
    ///
    /// Commands the flywheel setpoint, then runs the feeder and agitator only
    /// if the flywheel is at speed. Returns whether feeding is active.
    pub fn feed<D, F, P, G>(
        &self,
        hw: &mut Hardware<D, F, P, G>,
        state: &mut RobotState,
        target: FeedTarget,
    ) -> Result<bool, ActuatorError>
    where
        D: EncoderActuator,
        F: VelocityActuator,
        P: PowerActuator,
        G: GateServo,
    {
        hw.flywheel_velocity(state, target.velocity)?;

        let feeding = target.is_reached(hw.flywheel.velocity());
        if feeding {
            hw.feeder(state, self.feed_power)?;
            hw.agitator(state, self.agitator_power)?;
        } else {
            hw.feeder(state, 0.0)?;
            hw.agitator(state, 0.0)?;
        }
        Ok(feeding)
    }

    /// Stop the flywheel, feeder and agitator.
    pub fn stop<D, F, P, G>(
        &self,
        hw: &mut Hardware<D, F, P, G>,
        state: &mut RobotState,
    ) -> Result<(), ActuatorError>
    where
        D: EncoderActuator,
        F: VelocityActuator,
        P: PowerActuator,
        G: GateServo,
    {
        hw.flywheel_velocity(state, 0.0)?;
        hw.feeder(state, 0.0)?;
        hw.agitator(state, 0.0)
    }
}
