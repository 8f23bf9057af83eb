//! Driver input polling
//!
//! Inputs are polled once per tick. Level reads (`is_pressed`) and edge reads
//! (`was_pressed`) are separate calls: the shot trigger is level-checked
//! against `is_shooting`, while the mode selector must only advance on a
//! fresh press.

/// ASCII key code driving forward in keyboard mode (`i`)
pub const KEY_FORWARD: u8 = b'i';
/// ASCII key code driving backward in keyboard mode (`k`)
pub const KEY_BACKWARD: u8 = b'k';
/// ASCII key code turning left in keyboard mode (`j`)
pub const KEY_LEFT: u8 = b'j';
/// ASCII key code turning right in keyboard mode (`l`)
pub const KEY_RIGHT: u8 = b'l';
/// ASCII key code firing one shot in keyboard mode (`p`)
pub const KEY_SHOOT: u8 = b'p';

/// Digital inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Cross (A on Xbox-style pads)
    Cross,
    /// Circle (B)
    Circle,
    /// Square (X)
    Square,
    /// Triangle (Y)
    Triangle,
    LeftBumper,
    RightBumper,
    /// Options / start-adjacent button
    Options,
    /// Home / PS button, used to cycle the mode selector during init
    Home,
    DpadLeft,
    DpadRight,
    /// Keyboard key by ASCII code
    Key(u8),
}

/// Analog inputs in [-1.0, +1.0]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    LeftStickX,
    /// Pushing the stick up reads negative
    LeftStickY,
    RightStickX,
    RightStickY,
}

/// Polled driver input.
pub trait InputSource {
    /// Level read: true while the button is held.
    fn is_pressed(&self, button: Button) -> bool;

    /// Edge read: true once per press, on the first poll after it went down.
    fn was_pressed(&mut self, button: Button) -> bool;

    /// Analog read in [-1.0, +1.0].
    fn axis(&self, axis: Axis) -> f32;

    /// Level read as a signed unit value: `positive` minus `negative`.
    fn key_axis(&self, positive: Button, negative: Button) -> f32 {
        let p = if self.is_pressed(positive) { 1.0 } else { 0.0 };
        let n = if self.is_pressed(negative) { 1.0 } else { 0.0 };
        p - n
    }
}
