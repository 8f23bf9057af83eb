//! Launcher control
//!
//! - [`feeder`]: velocity-gated feeding at a flywheel preset
//! - [`sequencer`]: timed gate-open / gate-closing / settling shot

pub mod feeder;
pub mod sequencer;

pub use feeder::{should_feed, FeedTarget, FeederGate, ShotPreset};
pub use sequencer::{ShotPhase, ShotSequencer};
