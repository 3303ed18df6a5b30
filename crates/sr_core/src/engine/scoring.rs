//! Scoring Engine
//!
//! Pure score-delta application with the floor-at-zero invariant. Every
//! score-affecting event is exactly one delta paired with a history append
//! (two appends for relocation), so score and log can never diverge.

use super::robot::RobotState;

pub const CHECKPOINT_AWARD: i32 = 10;
pub const LACK_OF_PROGRESS_PENALTY: i32 = -5;
pub const MISIDENTIFICATION_PENALTY: i32 = -5;
pub const TYPE_MATCH_BONUS: i32 = 10;
pub const EXIT_AWARD: i32 = 10;

/// Apply a signed delta. The score never goes below zero, under any
/// sequence of deltas.
pub fn apply_delta(robot: &mut RobotState, delta: i32) {
    robot.score = (robot.score + delta).max(0);
}

/// Apply a delta and append the matching history line in one step.
pub fn score_event(robot: &mut RobotState, delta: i32, text: &str, remaining_mmss: &str) {
    apply_delta(robot, delta);
    robot.history.push(text, remaining_mmss);
}

/// Percentage bonus awarded on a successful exit, on top of the flat exit
/// award: 10% of the robot's score at that moment, rounded down.
pub fn exit_completion_bonus(score: i32) -> i32 {
    // floor(score * 0.10) for a non-negative score
    score / 10
}
