//! Parameter management
//!
//! A [`ParameterStore`] holds named values registered with defaults. Each
//! parameter block reads its values back out with clamping and validates the
//! result before the op mode is built.

pub mod auto;
pub mod drive;
pub mod error;
pub mod feeder;
pub mod shooter;
pub mod storage;

pub use auto::{AutoParams, ShootMode};
pub use drive::DriveParams;
pub use error::ParameterError;
pub use feeder::FeederParams;
pub use shooter::ShooterParams;
pub use storage::{
    ParamFlags, ParamMetadata, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN,
};
