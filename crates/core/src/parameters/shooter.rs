//! Shot Sequencer Parameter Definitions
//!
//! # Parameters
//!
//! - `SHOT_POWER` - Flywheel power while the gate is open (0.0-1.0)
//! - `SHOT_OPEN_MS` - Gate open duration
//! - `SHOT_CLOSE_MS` - Gate closing duration before the flywheel stops
//! - `SHOT_SETTLE_MS` - Settling time before the next shot may start
//! - `GATE_OPEN_POS` / `GATE_CLOSED_POS` - Gate servo positions

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

const DEFAULT_SHOOT_POWER: f32 = 0.8;
const DEFAULT_OPEN_MS: i32 = 250;
const DEFAULT_CLOSE_MS: i32 = 200;
const DEFAULT_SETTLE_MS: i32 = 1500;
const DEFAULT_GATE_OPEN: f32 = 0.0;
const DEFAULT_GATE_CLOSED: f32 = 0.2;

/// Longest phase accepted by validation
const MAX_PHASE_MS: u32 = 10_000;

/// Timed shot sequence parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShooterParams {
    /// Flywheel power while shooting
    pub shoot_power: f32,
    /// Gate open duration (ms)
    pub open_ms: u32,
    /// Gate closing duration (ms)
    pub close_ms: u32,
    /// Settling duration (ms)
    pub settle_ms: u32,
    /// Gate position letting one game piece through
    pub gate_open: f32,
    /// Gate position holding game pieces back
    pub gate_closed: f32,
}

impl Default for ShooterParams {
    fn default() -> Self {
        Self {
            shoot_power: DEFAULT_SHOOT_POWER,
            open_ms: DEFAULT_OPEN_MS as u32,
            close_ms: DEFAULT_CLOSE_MS as u32,
            settle_ms: DEFAULT_SETTLE_MS as u32,
            gate_open: DEFAULT_GATE_OPEN,
            gate_closed: DEFAULT_GATE_CLOSED,
        }
    }
}

impl ShooterParams {
    /// Register shooter parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "SHOT_POWER",
            ParamValue::Float(DEFAULT_SHOOT_POWER),
            ParamFlags::empty(),
        )?;
        store.register(
            "SHOT_OPEN_MS",
            ParamValue::Int(DEFAULT_OPEN_MS),
            ParamFlags::empty(),
        )?;
        store.register(
            "SHOT_CLOSE_MS",
            ParamValue::Int(DEFAULT_CLOSE_MS),
            ParamFlags::empty(),
        )?;
        store.register(
            "SHOT_SETTLE_MS",
            ParamValue::Int(DEFAULT_SETTLE_MS),
            ParamFlags::empty(),
        )?;
        store.register(
            "GATE_OPEN_POS",
            ParamValue::Float(DEFAULT_GATE_OPEN),
            ParamFlags::empty(),
        )?;
        store.register(
            "GATE_CLOSED_POS",
            ParamValue::Float(DEFAULT_GATE_CLOSED),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load shooter parameters from the store, clamping out-of-range values
    pub fn from_store(store: &ParameterStore) -> Self {
        let phase = |name: &str, default: i32| {
            store
                .get_i32_or(name, default)
                .clamp(0, MAX_PHASE_MS as i32) as u32
        };

        Self {
            shoot_power: store
                .get_f32_or("SHOT_POWER", DEFAULT_SHOOT_POWER)
                .clamp(0.0, 1.0),
            open_ms: phase("SHOT_OPEN_MS", DEFAULT_OPEN_MS),
            close_ms: phase("SHOT_CLOSE_MS", DEFAULT_CLOSE_MS),
            settle_ms: phase("SHOT_SETTLE_MS", DEFAULT_SETTLE_MS),
            gate_open: store
                .get_f32_or("GATE_OPEN_POS", DEFAULT_GATE_OPEN)
                .clamp(0.0, 1.0),
            gate_closed: store
                .get_f32_or("GATE_CLOSED_POS", DEFAULT_GATE_CLOSED)
                .clamp(0.0, 1.0),
        }
    }

    /// Full trigger-to-idle duration (ms)
    pub fn sequence_ms(&self) -> u32 {
        self.open_ms + self.close_ms + self.settle_ms
    }

    /// Validate shooter parameters
    pub fn is_valid(&self) -> bool {
        if !(self.shoot_power > 0.0 && self.shoot_power <= 1.0) {
            return false;
        }

        if self.open_ms > MAX_PHASE_MS
            || self.close_ms > MAX_PHASE_MS
            || self.settle_ms > MAX_PHASE_MS
        {
            return false;
        }

        let positions = 0.0..=1.0;
        positions.contains(&self.gate_open)
            && positions.contains(&self.gate_closed)
            && self.gate_open != self.gate_closed
    }
}
