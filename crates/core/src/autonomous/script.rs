//! Autonomous scripts
//!
//! An ordered, fixed-capacity list of [`AutoStep`]s, authored once for the
//! blue alliance and mirrored for red.

use heapless::Vec;

use super::step::{Alliance, AutoStep};
use crate::error::ConfigError;

/// Maximum steps in one script
pub const MAX_STEPS: usize = 16;

/// Immutable step list consumed top to bottom by the runner
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AutoScript {
    steps: Vec<AutoStep, MAX_STEPS>,
}

impl AutoScript {
    /// Build a script from `steps`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ScriptTooLong` past [`MAX_STEPS`].
    pub fn from_steps(steps: &[AutoStep]) -> Result<Self, ConfigError> {
        let steps =
            Vec::from_slice(steps).map_err(|_| ConfigError::ScriptTooLong { max: MAX_STEPS })?;
        Ok(Self { steps })
    }

    /// Copy of this script for `alliance`.
    pub fn mirrored_for(&self, alliance: Alliance) -> Self {
        if !alliance.is_mirrored() {
            return self.clone();
        }
        Self {
            steps: self.steps.iter().map(AutoStep::mirrored).collect(),
        }
    }

    pub fn steps(&self) -> &[AutoStep] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&AutoStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
