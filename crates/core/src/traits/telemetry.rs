//! Telemetry sink
//!
//! Lines and key/value entries are batched during a tick and flushed with
//! [`TelemetrySink::update`].

use core::fmt::Display;

/// Batched-then-flushed telemetry channel.
pub trait TelemetrySink {
    /// Queue a free-form line.
    fn add_line(&mut self, line: &str);

    /// Queue a `key: value` entry.
    fn add_data(&mut self, key: &str, value: &dyn Display);

    /// Flush everything queued since the last update.
    fn update(&mut self);
}
