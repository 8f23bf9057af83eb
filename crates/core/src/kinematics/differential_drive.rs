//! Differential drive mixing for two-sided drivetrains
//!
//! Sign convention: positive `turn` spins the robot clockwise (to the right),
//! so the left side speeds up and the right side slows down.
//!
//! # Examples
//!
//! ```
//! use starterbot_core::kinematics::DifferentialDrive;
//!
//! // Straight forward
//! assert_eq!(DifferentialDrive::mix(1.0, 0.0, 1.0), (1.0, 1.0));
//!
//! // Spin right in place
//! assert_eq!(DifferentialDrive::mix(0.0, 1.0, 1.0), (1.0, -1.0));
//!
//! // Half-speed limiter
//! assert_eq!(DifferentialDrive::mix(1.0, 0.0, 0.5), (0.5, 0.5));
//! ```

use libm::fabsf;

/// Differential drive mixer (zero-sized namespace type)
pub struct DifferentialDrive;

impl DifferentialDrive {
    /// Mix forward/turn inputs into (left, right) drive powers.
    ///
    /// `left = scale * (forward + turn)`, `right = scale * (forward - turn)`.
    ///
    /// No clamping is performed: with `forward` and `turn` each in
    /// [-1.0, +1.0] the sum can reach ±2.0 · `scale`. Callers that cannot
    /// pre-bound their inputs use [`mix_normalized`](Self::mix_normalized).
    #[inline]
    pub fn mix(forward: f32, turn: f32, scale: f32) -> (f32, f32) {
        (scale * (forward + turn), scale * (forward - turn))
    }

    /// Mix, then scale both sides down proportionally if either exceeds 1.0.
    ///
    /// Preserves the left/right ratio, so a saturated arc still curves the
    /// same way.
    #[inline]
    pub fn mix_normalized(forward: f32, turn: f32, scale: f32) -> (f32, f32) {
        let (mut left, mut right) = Self::mix(forward, turn, scale);

        let max_magnitude = fabsf(left).max(fabsf(right));
        if max_magnitude > 1.0 {
            left /= max_magnitude;
            right /= max_magnitude;
        }

        (left, right)
    }
}
