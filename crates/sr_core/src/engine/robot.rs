//! Robot State
//!
//! Per-robot mutable record owned exclusively by the supervisor: zone
//! membership flags, visited-zone set, last checkpoint, stall tracking,
//! the pending telemetry message and the two history containers.

use std::collections::HashSet;

use crate::models::{Vec3, ZoneId};

use super::constants::STALL_EPSILON;
use super::history::RobotHistory;
use super::telemetry::TelemetryMessage;

pub const DEFAULT_TEAM_NAME: &str = "NO_TEAM_NAME";

/// Accumulates continuous near-zero-velocity time. Any axis exceeding the
/// epsilon resets the accumulator to zero.
#[derive(Debug, Clone, Default)]
pub struct StallTracker {
    duration: f64,
}

impl StallTracker {
    /// Advance by one frame of simulated time.
    pub fn update(&mut self, velocity: Vec3, frame_delta: f64) {
        let stopped = velocity.x.abs() < STALL_EPSILON
            && velocity.y.abs() < STALL_EPSILON
            && velocity.z.abs() < STALL_EPSILON;
        if stopped {
            self.duration += frame_delta;
        } else {
            self.duration = 0.0;
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn reset(&mut self) {
        self.duration = 0.0;
    }
}

#[derive(Debug, Clone)]
pub struct RobotState {
    /// Whether the robot currently has a node in the simulation. Absent
    /// robots are excluded from every evaluation pass.
    pub present: bool,
    pub name: String,
    /// Non-negative by construction; mutated only through the scoring
    /// engine's delta application.
    pub(crate) score: i32,
    pub in_checkpoint: bool,
    pub in_swamp: bool,
    /// Zones already credited this match, keyed by zone identity.
    pub visited_zones: HashSet<ZoneId>,
    /// Relocation target; starts at the start-zone center.
    pub last_checkpoint: Vec3,
    /// The robot's own start zone: relocation seed and valid-exit boundary.
    pub start_zone: Option<ZoneId>,
    pub stall: StallTracker,
    /// Single unread controller message, last-write-wins.
    pub pending_message: Option<TelemetryMessage>,
    pub history: RobotHistory,
}

impl Default for RobotState {
    fn default() -> Self {
        Self::new()
    }
}

impl RobotState {
    pub fn new() -> Self {
        Self {
            present: false,
            name: DEFAULT_TEAM_NAME.to_string(),
            score: 0,
            in_checkpoint: false,
            in_swamp: false,
            visited_zones: HashSet::new(),
            last_checkpoint: Vec3::default(),
            start_zone: None,
            stall: StallTracker::default(),
            pending_message: None,
            history: RobotHistory::default(),
        }
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    /// Seed the start zone: pre-visited so a robot cannot re-earn credit
    /// for its own start tile, and the initial relocation target.
    pub fn assign_start_zone(&mut self, id: ZoneId, center: Vec3) {
        self.start_zone = Some(id);
        self.visited_zones.insert(id);
        self.last_checkpoint = center;
    }

    /// Take the pending message, leaving the slot empty.
    pub fn take_message(&mut self) -> Option<TelemetryMessage> {
        self.pending_message.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stall_accumulates_while_stopped() {
        let mut stall = StallTracker::default();
        let stopped = Vec3::new(0.005, 0.0, -0.003);
        for _ in 0..10 {
            stall.update(stopped, 0.5);
        }
        assert!((stall.duration() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_any_axis_movement_resets_stall() {
        let mut stall = StallTracker::default();
        stall.update(Vec3::default(), 4.0);
        assert_eq!(stall.duration(), 4.0);

        stall.update(Vec3::new(0.0, 0.02, 0.0), 0.5);
        assert_eq!(stall.duration(), 0.0);

        stall.update(Vec3::default(), 1.0);
        assert_eq!(stall.duration(), 1.0);
    }

    #[test]
    fn test_velocity_at_epsilon_counts_as_moving() {
        let mut stall = StallTracker::default();
        stall.update(Vec3::new(STALL_EPSILON, 0.0, 0.0), 1.0);
        assert_eq!(stall.duration(), 0.0);
    }

    #[test]
    fn test_start_zone_seeding() {
        let mut robot = RobotState::new();
        let center = Vec3::new(1.0, 0.0, 2.0);
        robot.assign_start_zone(ZoneId(3), center);

        assert_eq!(robot.start_zone, Some(ZoneId(3)));
        assert!(robot.visited_zones.contains(&ZoneId(3)));
        assert_eq!(robot.last_checkpoint, center);
    }

    #[test]
    fn test_new_robot_defaults() {
        let robot = RobotState::new();
        assert!(!robot.present);
        assert_eq!(robot.name, DEFAULT_TEAM_NAME);
        assert_eq!(robot.score(), 0);
        assert!(robot.pending_message.is_none());
    }
}
