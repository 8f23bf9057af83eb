//! Autonomous Parameter Definitions
//!
//! The two autonomous variants fire differently: one repeats the timed shot
//! sequence a fixed number of times, the other feeds continuously at the bank
//! preset for a wall-clock duration with a looser tolerance. Both are kept.
//!
//! # Parameters
//!
//! - `AUTO_SHOOT_MODE` - 0 = shot count, 1 = duration
//! - `AUTO_SHOOT_MS` - Continuous feeding ceiling (ms)
//! - `AUTO_SHOOT_CNT` - Shots per Shoot step in count mode
//! - `AUTO_BANK_TOL` - Bank feed tolerance during autonomous (ticks/s)

use super::error::ParameterError;
use super::feeder::FeederParams;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::autonomous::ShootBound;
use crate::shooter::{FeedTarget, ShotPreset};

const DEFAULT_SHOOT_MODE: i32 = 1;
const DEFAULT_SHOOT_MS: i32 = 10_000;
const DEFAULT_SHOOT_COUNT: i32 = 3;
const DEFAULT_BANK_TOLERANCE: f32 = 100.0;

const MAX_SHOOT_MS: i32 = 30_000;
const MAX_SHOOT_COUNT: i32 = 10;

/// How an autonomous Shoot step is bounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShootMode {
    /// Repeat the timed shot sequence
    Count,
    /// Velocity-gated feeding until a time ceiling
    #[default]
    Duration,
}

impl ShootMode {
    fn from_i32(value: i32) -> Self {
        match value {
            0 => ShootMode::Count,
            _ => ShootMode::Duration,
        }
    }
}

/// Autonomous parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoParams {
    pub shoot_mode: ShootMode,
    /// Continuous feeding ceiling (ms)
    pub shoot_ms: u32,
    /// Shots per step in count mode
    pub shoot_count: u8,
    /// Bank tolerance used while feeding in autonomous
    pub bank_tolerance: f32,
}

impl Default for AutoParams {
    fn default() -> Self {
        Self {
            shoot_mode: ShootMode::from_i32(DEFAULT_SHOOT_MODE),
            shoot_ms: DEFAULT_SHOOT_MS as u32,
            shoot_count: DEFAULT_SHOOT_COUNT as u8,
            bank_tolerance: DEFAULT_BANK_TOLERANCE,
        }
    }
}

impl AutoParams {
    /// Register autonomous parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "AUTO_SHOOT_MODE",
            ParamValue::Int(DEFAULT_SHOOT_MODE),
            ParamFlags::empty(),
        )?;
        store.register(
            "AUTO_SHOOT_MS",
            ParamValue::Int(DEFAULT_SHOOT_MS),
            ParamFlags::empty(),
        )?;
        store.register(
            "AUTO_SHOOT_CNT",
            ParamValue::Int(DEFAULT_SHOOT_COUNT),
            ParamFlags::empty(),
        )?;
        store.register(
            "AUTO_BANK_TOL",
            ParamValue::Float(DEFAULT_BANK_TOLERANCE),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load autonomous parameters from the store
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            shoot_mode: ShootMode::from_i32(
                store.get_i32_or("AUTO_SHOOT_MODE", DEFAULT_SHOOT_MODE),
            ),
            shoot_ms: store
                .get_i32_or("AUTO_SHOOT_MS", DEFAULT_SHOOT_MS)
                .clamp(0, MAX_SHOOT_MS) as u32,
            shoot_count: store
                .get_i32_or("AUTO_SHOOT_CNT", DEFAULT_SHOOT_COUNT)
                .clamp(1, MAX_SHOOT_COUNT) as u8,
            bank_tolerance: store
                .get_f32_or("AUTO_BANK_TOL", DEFAULT_BANK_TOLERANCE)
                .max(0.0),
        }
    }

    /// Bank feed target with the autonomous tolerance
    pub fn bank_target(&self, feeder: &FeederParams) -> FeedTarget {
        FeedTarget {
            velocity: feeder.velocity(ShotPreset::Bank),
            tolerance: self.bank_tolerance,
        }
    }

    /// Bound for a Shoot step under the configured mode
    pub fn shoot_bound(&self, feeder: &FeederParams) -> ShootBound {
        match self.shoot_mode {
            ShootMode::Count => ShootBound::Count(self.shoot_count),
            ShootMode::Duration => ShootBound::Duration {
                ms: self.shoot_ms,
                target: self.bank_target(feeder),
            },
        }
    }

    /// Validate autonomous parameters
    pub fn is_valid(&self) -> bool {
        self.shoot_count > 0
            && self.shoot_ms > 0
            && self.bank_tolerance.is_finite()
            && self.bank_tolerance >= 0.0
    }
}
