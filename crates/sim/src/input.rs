//! Scripted driver input
//!
//! Tests hold and release buttons between ticks. A press is latched as an
//! edge until the next `was_pressed` poll for that button, the same way a
//! driver station reports a fresh press once.

use std::collections::{HashMap, HashSet};

use starterbot_core::traits::{Axis, Button, InputSource};

#[derive(Debug, Default, Clone)]
pub struct SimInput {
    held: HashSet<Button>,
    edges: HashSet<Button>,
    axes: HashMap<Axis, f32>,
}

impl SimInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `button`. Pressing an already-held button is not a new edge.
    pub fn press(&mut self, button: Button) {
        if self.held.insert(button) {
            self.edges.insert(button);
        }
    }

    pub fn release(&mut self, button: Button) {
        self.held.remove(&button);
    }

    /// Stick position, clamped to [-1.0, 1.0].
    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        self.axes.insert(axis, value.clamp(-1.0, 1.0));
    }

    /// Release everything and center the sticks.
    pub fn clear(&mut self) {
        self.held.clear();
        self.edges.clear();
        self.axes.clear();
    }
}

impl InputSource for SimInput {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_reported_once_per_press() {
        let mut input = SimInput::new();
        input.press(Button::Home);
        assert!(input.was_pressed(Button::Home));
        assert!(!input.was_pressed(Button::Home));
        assert!(input.is_pressed(Button::Home));

        // Holding again without a release is not a new press
        input.press(Button::Home);
        assert!(!input.was_pressed(Button::Home));

        input.release(Button::Home);
        input.press(Button::Home);
        assert!(input.was_pressed(Button::Home));
    }

    #[test]
    fn quick_tap_between_polls_still_counts() {
        let mut input = SimInput::new();
        input.press(Button::Home);
        input.release(Button::Home);
        assert!(!input.is_pressed(Button::Home));
        assert!(input.was_pressed(Button::Home));
    }
}
