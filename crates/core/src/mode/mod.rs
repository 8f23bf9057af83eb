//! Operating modes and the init-time mode selector
//!
//! Two cycles exist:
//!
//! - [`DRIVE_CYCLE`]: Keyboard → Gamepad → Autonomous, chosen by a fixed
//!   configuration value
//! - [`MATCH_CYCLE`]: TeleOp → AutoBlue → AutoRed, cycled interactively with
//!   the Home button during init
//!
//! Transitions come from an explicit table ([`next_in_cycle`]) rather than
//! string comparisons.

mod selector;

pub use selector::ModeSelector;

use core::fmt;

/// Operating mode, immutable once locked at the start signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatingMode {
    /// Keyboard drive (i/j/k/l, p to shoot)
    Keyboard,
    /// Gamepad arcade drive, Cross to shoot
    Gamepad,
    /// Timed autonomous, then keyboard drive
    Autonomous,
    /// Split-stick teleop with flywheel presets
    #[default]
    TeleOp,
    /// Encoder autonomous, blue alliance
    AutoBlue,
    /// Encoder autonomous, red alliance (mirrored)
    AutoRed,
}

impl OperatingMode {
    /// Display name shown on telemetry.
    pub fn name(&self) -> &'static str {
        match self {
            OperatingMode::Keyboard => "KEYBOARD",
            OperatingMode::Gamepad => "GAMEPAD",
            OperatingMode::Autonomous => "AUTO",
            OperatingMode::TeleOp => "TELEOP",
            OperatingMode::AutoBlue => "AUTO BLUE",
            OperatingMode::AutoRed => "AUTO RED",
        }
    }

    /// True for modes that run a script without live driver input.
    pub fn is_autonomous(&self) -> bool {
        matches!(
            self,
            OperatingMode::Autonomous | OperatingMode::AutoBlue | OperatingMode::AutoRed
        )
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-configuration drive mode cycle
pub const DRIVE_CYCLE: &[OperatingMode] = &[
    OperatingMode::Keyboard,
    OperatingMode::Gamepad,
    OperatingMode::Autonomous,
];

/// Interactive match mode cycle
pub const MATCH_CYCLE: &[OperatingMode] = &[
    OperatingMode::TeleOp,
    OperatingMode::AutoBlue,
    OperatingMode::AutoRed,
];

/// Transition table: the mode after `current` in `cycle`, wrapping around.
///
/// Returns `None` when `current` is not part of `cycle`.
pub fn next_in_cycle(cycle: &[OperatingMode], current: OperatingMode) -> Option<OperatingMode> {
    let index = cycle.iter().position(|m| *m == current)?;
    cycle.get((index + 1) % cycle.len()).copied()
}
