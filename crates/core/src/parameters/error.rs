//! Parameter store errors

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Name longer than [`PARAM_NAME_LEN`](super::PARAM_NAME_LEN)
    NameTooLong,
    /// No parameter registered under this name
    Unknown,
    /// Every slot is taken
    StoreFull,
    /// Registered read-only; overrides are rejected
    ReadOnly,
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParameterError::NameTooLong => "parameter name too long",
            ParameterError::Unknown => "unknown parameter",
            ParameterError::StoreFull => "parameter store full",
            ParameterError::ReadOnly => "parameter is read-only",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for ParameterError {}
