use starterbot_core::error::{ConfigError, ControlError};

/// Errors that can occur while running a simulated op mode.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Configuration rejected: {0}")]
    Config(#[from] ConfigError),

    #[error("Control loop failed: {0}")]
    Control(#[from] ControlError),

    #[error("Timeout after {waited_ms} ms waiting for {what}")]
    Timeout { what: &'static str, waited_ms: u64 },

    #[error("Device already registered: {0}")]
    DuplicateDevice(&'static str),
}
