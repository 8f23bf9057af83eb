//! Velocity-Gated Feeder Parameter Definitions
//!
//! # Parameters
//!
//! - `FEED_BANK_VEL` / `FEED_FAR_VEL` / `FEED_MAX_VEL` - Flywheel presets (ticks/s)
//! - `FEED_BANK_TOL` / `FEED_FAR_TOL` - How far below target feeding may start
//! - `FEED_POWER` - Feeder power while at speed
//! - `AGIT_POWER` - Agitator power while a preset is held

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::shooter::{FeedTarget, ShotPreset};

const DEFAULT_BANK_VELOCITY: f32 = 1300.0;
const DEFAULT_FAR_VELOCITY: f32 = 1900.0;
const DEFAULT_MAX_VELOCITY: f32 = 2200.0;
const DEFAULT_BANK_TOLERANCE: f32 = 50.0;
const DEFAULT_FAR_TOLERANCE: f32 = 100.0;
const DEFAULT_FEED_POWER: f32 = 1.0;
const DEFAULT_AGITATOR_POWER: f32 = -1.0;

/// Upper bound on any flywheel preset (ticks/s)
const MAX_FLYWHEEL_VELOCITY: f32 = 3000.0;

/// Feeder gate parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeederParams {
    pub bank_velocity: f32,
    pub far_velocity: f32,
    pub max_velocity: f32,
    pub bank_tolerance: f32,
    pub far_tolerance: f32,
    pub feed_power: f32,
    pub agitator_power: f32,
}

impl Default for FeederParams {
    fn default() -> Self {
        Self {
            bank_velocity: DEFAULT_BANK_VELOCITY,
            far_velocity: DEFAULT_FAR_VELOCITY,
            max_velocity: DEFAULT_MAX_VELOCITY,
            bank_tolerance: DEFAULT_BANK_TOLERANCE,
            far_tolerance: DEFAULT_FAR_TOLERANCE,
            feed_power: DEFAULT_FEED_POWER,
            agitator_power: DEFAULT_AGITATOR_POWER,
        }
    }
}

impl FeederParams {
    /// Register feeder parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let defaults = [
            ("FEED_BANK_VEL", DEFAULT_BANK_VELOCITY),
            ("FEED_FAR_VEL", DEFAULT_FAR_VELOCITY),
            ("FEED_MAX_VEL", DEFAULT_MAX_VELOCITY),
            ("FEED_BANK_TOL", DEFAULT_BANK_TOLERANCE),
            ("FEED_FAR_TOL", DEFAULT_FAR_TOLERANCE),
            ("FEED_POWER", DEFAULT_FEED_POWER),
            ("AGIT_POWER", DEFAULT_AGITATOR_POWER),
        ];
        for (name, value) in defaults {
            store.register(name, ParamValue::Float(value), ParamFlags::empty())?;
        }
        Ok(())
    }

    /// Load feeder parameters from the store, clamping out-of-range values
    pub fn from_store(store: &ParameterStore) -> Self {
        let velocity = |name: &str, default: f32| {
            store
                .get_f32_or(name, default)
                .clamp(0.0, MAX_FLYWHEEL_VELOCITY)
        };
        let power = |name: &str, default: f32| store.get_f32_or(name, default).clamp(-1.0, 1.0);

        Self {
            bank_velocity: velocity("FEED_BANK_VEL", DEFAULT_BANK_VELOCITY),
            far_velocity: velocity("FEED_FAR_VEL", DEFAULT_FAR_VELOCITY),
            max_velocity: velocity("FEED_MAX_VEL", DEFAULT_MAX_VELOCITY),
            bank_tolerance: velocity("FEED_BANK_TOL", DEFAULT_BANK_TOLERANCE),
            far_tolerance: velocity("FEED_FAR_TOL", DEFAULT_FAR_TOLERANCE),
            feed_power: power("FEED_POWER", DEFAULT_FEED_POWER),
            agitator_power: power("AGIT_POWER", DEFAULT_AGITATOR_POWER),
        }
    }

    /// Flywheel velocity for a preset
    pub fn velocity(&self, preset: ShotPreset) -> f32 {
        match preset {
            ShotPreset::Bank => self.bank_velocity,
            ShotPreset::Far => self.far_velocity,
            ShotPreset::Max => self.max_velocity,
        }
    }

    /// Velocity and feed tolerance for a preset
    ///
    /// The max preset shares the far tolerance.
    pub fn target(&self, preset: ShotPreset) -> FeedTarget {
        let tolerance = match preset {
            ShotPreset::Bank => self.bank_tolerance,
            ShotPreset::Far | ShotPreset::Max => self.far_tolerance,
        };
        FeedTarget {
            velocity: self.velocity(preset),
            tolerance,
        }
    }

    /// Validate feeder parameters
    ///
    /// Comparisons are written so a NaN anywhere fails validation.
    pub fn is_valid(&self) -> bool {
        (0.0..self.bank_velocity).contains(&self.bank_tolerance)
            && (0.0..self.far_velocity).contains(&self.far_tolerance)
            && self.bank_velocity <= self.far_velocity
            && self.far_velocity <= self.max_velocity
            && self.feed_power > 0.0
            && self.feed_power <= 1.0
            && (-1.0..=1.0).contains(&self.agitator_power)
    }
}
