//! Built-in autonomous scripts
//!
//! Both are authored for the blue alliance side of the field.

use starterbot_core::autonomous::{Alliance, AutoScript, AutoStep, ShootBound};
use starterbot_core::error::ConfigError;

use crate::config::RobotConfig;

/// Safety timeout for every encoder move
pub const DRIVE_TIMEOUT_MS: u32 = 5_000;

/// Time the human player gets to load the robot at the loading zone
pub const LOADING_WAIT_MS: u32 = 10_000;

/// Encoder autonomous: fire the preloads, back off the goal, turn toward the
/// launch line and drive off it.
///
/// The shoot step follows the configured autonomous shoot mode. The turn is
/// mirrored for the red alliance.
pub fn starter_bot_auto(
    config: &RobotConfig,
    alliance: Alliance,
) -> Result<AutoScript, ConfigError> {
    let ticks = |inches: f32| config.drive.inches_to_ticks(inches);

    let script = AutoScript::from_steps(&[
        AutoStep::shoot(config.auto.shoot_bound(&config.feeder)),
        AutoStep::encoder_drive(0.5, ticks(-12.0), ticks(-12.0), DRIVE_TIMEOUT_MS),
        AutoStep::encoder_turn(0.5, ticks(-8.0), ticks(8.0), DRIVE_TIMEOUT_MS),
        AutoStep::encoder_drive(1.0, ticks(-50.0), ticks(-50.0), DRIVE_TIMEOUT_MS),
    ])?;

    Ok(script.mirrored_for(alliance))
}

/// Timed autonomous: drive to the goal, shoot, go back to the loading zone
/// for a reload, return and shoot again.
///
/// Shots are always counted here; the robot has no velocity feedback on the
/// flywheel in this program.
pub fn drive_to_goal(config: &RobotConfig) -> Result<AutoScript, ConfigError> {
    let volley = AutoStep::shoot(ShootBound::Count(config.auto.shoot_count));

    AutoScript::from_steps(&[
        AutoStep::timed_drive(1.0, 1.0, 1_200),
        AutoStep::timed_turn(-1.0, 1.0, 230),
        AutoStep::wait(500),
        volley,
        AutoStep::timed_drive(-1.0, -1.0, 1_500),
        AutoStep::wait(LOADING_WAIT_MS),
        AutoStep::timed_drive(1.0, 1.0, 1_500),
        AutoStep::wait(500),
        volley,
    ])
}
