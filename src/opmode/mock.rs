//! Input and telemetry doubles for controller tests.
//!
//! Motor and servo doubles come from `starterbot_core::hardware::mock`.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;

pub use starterbot_core::hardware::mock::{hardware, MockMotor, MockServo};
use starterbot_core::traits::{Axis, Button, InputSource, MockTime, TelemetrySink};

use super::OpModeController;

pub type MockController = OpModeController<MockMotor, MockMotor, MockMotor, MockServo, MockTime>;

/// Input whose buttons and sticks are set by the test.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    held: HashSet<Button>,
    edges: HashSet<Button>,
    axes: HashMap<Axis, f32>,
}

impl ScriptedInput {
    /// Hold `button`; the first poll afterwards sees one edge.
    pub fn press(&mut self, button: Button) {
        if self.held.insert(button) {
            self.edges.insert(button);
        }
    }

    pub fn release(&mut self, button: Button) {
        self.held.remove(&button);
        self.edges.remove(&button);
    }

    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        self.axes.insert(axis, value);
    }
}

impl InputSource for ScriptedInput {
    fn is_pressed(&self, button: Button) -> bool {
        self.held.contains(&button)
    }

    fn was_pressed(&mut self, button: Button) -> bool {
        self.edges.remove(&button)
    }

    fn axis(&self, axis: Axis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }
}

/// Telemetry sink that keeps everything it is sent.
#[derive(Debug, Default)]
pub struct Recorder {
    pub lines: Vec<String>,
    pub data: Vec<(String, String)>,
    pub updates: u32,
}

impl Recorder {
    pub fn has_data(&self, key: &str) -> bool {
        self.data.iter().any(|(k, _)| k == key)
    }
}

impl TelemetrySink for Recorder {
    fn add_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn add_data(&mut self, key: &str, value: &dyn Display) {
        self.data.push((key.to_string(), value.to_string()));
    }

    fn update(&mut self) {
        self.updates += 1;
    }
}
