//! Logging macros
//!
//! Thin wrappers over the `log` facade so op-mode code logs the same way on
//! every host. The host installs whichever `log::Log` implementation suits
//! it (the simulator installs a capture buffer). With no logger installed
//! the macros are no-ops.
//!
//! ```
//! starterbot::log_info!("selected {}", "TELEOP");
//! ```

#[doc(hidden)]
pub use log as __log;

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::__log::info!(target: "starterbot", $($arg)*)
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logging::__log::warn!(target: "starterbot", $($arg)*)
    };
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::__log::error!(target: "starterbot", $($arg)*)
    };
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logging::__log::debug!(target: "starterbot", $($arg)*)
    };
}
