//! Telemetry recorder
//!
//! Buffers lines and key/value entries like a driver station display and
//! keeps every flushed frame.

use std::fmt::Display;

/// One telemetry entry
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Line(String),
    Data { key: String, value: String },
}

/// Entries flushed by one `update`
pub type Frame = Vec<Entry>;

#[derive(Debug, Default)]
pub struct TelemetryRecorder {
    pending: Frame,
    frames: Vec<Frame>,
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Most recent value flushed for `key`.
    pub fn latest(&self, key: &str) -> Option<&str> {
        self.frames.iter().rev().flatten().find_map(|entry| match entry {
            Entry::Data { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// True if any flushed frame holds `line`.
    pub fn saw_line(&self, line: &str) -> bool {
        self.frames
            .iter()
            .flatten()
            .any(|entry| matches!(entry, Entry::Line(l) if l == line))
    }
}

impl starterbot_core::traits::TelemetrySink for TelemetryRecorder {
    fn add_line(&mut self, line: &str) {
        self.pending.push(Entry::Line(line.to_owned()));
    }

    fn add_data(&mut self, key: &str, value: &dyn Display) {
        self.pending.push(Entry::Data {
            key: key.to_owned(),
            value: value.to_string(),
        });
    }

    fn update(&mut self) {
        self.frames.push(std::mem::take(&mut self.pending));
    }
}
