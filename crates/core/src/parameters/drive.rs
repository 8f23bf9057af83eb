//! Drive Parameter Definitions
//!
//! - `DRIVE_MAX_POWER` - Speed limiter applied to mixed drive output
//! - `DRIVE_TICKS_IN` - Encoder ticks per inch of wheel travel

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

const DEFAULT_MAX_POWER: f32 = 1.0;

/// 28 counts per motor revolution, 5:1 and 3:1 gearboxes, 3 in wheel.
const DEFAULT_TICKS_PER_INCH: f32 = (28.0 * 5.0 * 3.0) / (3.0 * core::f32::consts::PI);

/// Drive parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveParams {
    /// Drive power scale in [0.0, 1.0]
    pub max_power: f32,
    /// Encoder ticks per inch of travel
    pub ticks_per_inch: f32,
}

impl Default for DriveParams {
    fn default() -> Self {
        Self {
            max_power: DEFAULT_MAX_POWER,
            ticks_per_inch: DEFAULT_TICKS_PER_INCH,
        }
    }
}

impl DriveParams {
    /// Register drive parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "DRIVE_MAX_POWER",
            ParamValue::Float(DEFAULT_MAX_POWER),
            ParamFlags::empty(),
        )?;
        store.register(
            "DRIVE_TICKS_IN",
            ParamValue::Float(DEFAULT_TICKS_PER_INCH),
            ParamFlags::READ_ONLY,
        )?;
        Ok(())
    }

    /// Load drive parameters from the store
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            max_power: store
                .get_f32_or("DRIVE_MAX_POWER", DEFAULT_MAX_POWER)
                .clamp(0.0, 1.0),
            ticks_per_inch: store.get_f32_or("DRIVE_TICKS_IN", DEFAULT_TICKS_PER_INCH),
        }
    }

    /// Convert inches of travel to whole encoder ticks (truncating)
    pub fn inches_to_ticks(&self, inches: f32) -> i32 {
        (inches * self.ticks_per_inch) as i32
    }

    /// Validate drive parameters
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.max_power)
            && self.ticks_per_inch.is_finite()
            && self.ticks_per_inch > 0.0
    }
}
