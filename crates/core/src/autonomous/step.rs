//! Autonomous step definitions

use crate::mode::OperatingMode;
use crate::shooter::FeedTarget;

/// How long a Shoot step fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShootBound {
    /// Run the timed shot sequence this many times
    Count(u8),
    /// Velocity-gated feeding toward `target` until `ms` have elapsed
    Duration { ms: u32, target: FeedTarget },
}

/// One scripted autonomous action
///
/// Steps flagged `turn` are the alliance-dependent part of a script and are
/// negated by [`mirrored`](Self::mirrored).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoStep {
    /// Open-loop drive powers held for a fixed time
    TimedDrive {
        left: f32,
        right: f32,
        duration_ms: u32,
        turn: bool,
    },
    /// Relative run-to-position move on both drive encoders
    EncoderDrive {
        speed: f32,
        left_ticks: i32,
        right_ticks: i32,
        timeout_ms: u32,
        turn: bool,
    },
    /// Do nothing for a fixed time
    Wait { duration_ms: u32 },
    /// Fire game pieces
    Shoot(ShootBound),
}

impl AutoStep {
    pub const fn timed_drive(left: f32, right: f32, duration_ms: u32) -> Self {
        AutoStep::TimedDrive {
            left,
            right,
            duration_ms,
            turn: false,
        }
    }

    pub const fn timed_turn(left: f32, right: f32, duration_ms: u32) -> Self {
        AutoStep::TimedDrive {
            left,
            right,
            duration_ms,
            turn: true,
        }
    }

    pub const fn encoder_drive(
        speed: f32,
        left_ticks: i32,
        right_ticks: i32,
        timeout_ms: u32,
    ) -> Self {
        AutoStep::EncoderDrive {
            speed,
            left_ticks,
            right_ticks,
            timeout_ms,
            turn: false,
        }
    }

    pub const fn encoder_turn(
        speed: f32,
        left_ticks: i32,
        right_ticks: i32,
        timeout_ms: u32,
    ) -> Self {
        AutoStep::EncoderDrive {
            speed,
            left_ticks,
            right_ticks,
            timeout_ms,
            turn: true,
        }
    }

    pub const fn wait(duration_ms: u32) -> Self {
        AutoStep::Wait { duration_ms }
    }

    pub const fn shoot(bound: ShootBound) -> Self {
        AutoStep::Shoot(bound)
    }

    /// True for alliance-dependent turn steps.
    pub fn is_turn(&self) -> bool {
        matches!(
            self,
            AutoStep::TimedDrive { turn: true, .. } | AutoStep::EncoderDrive { turn: true, .. }
        )
    }

    /// Same step for the opposite alliance.
    ///
    /// Turn steps get their per-side powers or distances negated
    /// (`i32::MIN` saturates to `i32::MAX`). Every other step is returned
    /// unchanged.
    pub fn mirrored(&self) -> Self {
        match *self {
            AutoStep::TimedDrive {
                left,
                right,
                duration_ms,
                turn: true,
            } => AutoStep::TimedDrive {
                left: -left,
                right: -right,
                duration_ms,
                turn: true,
            },
            AutoStep::EncoderDrive {
                speed,
                left_ticks,
                right_ticks,
                timeout_ms,
                turn: true,
            } => AutoStep::EncoderDrive {
                speed,
                left_ticks: left_ticks.saturating_neg(),
                right_ticks: right_ticks.saturating_neg(),
                timeout_ms,
                turn: true,
            },
            other => other,
        }
    }
}

/// Alliance side; scripts are authored for [`Alliance::Blue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alliance {
    #[default]
    Blue,
    Red,
}

impl Alliance {
    /// Alliance implied by an operating mode, if any.
    pub fn from_mode(mode: OperatingMode) -> Option<Self> {
        match mode {
            OperatingMode::AutoBlue => Some(Alliance::Blue),
            OperatingMode::AutoRed => Some(Alliance::Red),
            _ => None,
        }
    }

    /// True when scripts must be mirrored for this alliance.
    pub fn is_mirrored(&self) -> bool {
        *self == Alliance::Red
    }
}
