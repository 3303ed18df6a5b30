//! Match Clock
//!
//! Elapsed-time accumulator with run/pause semantics and a fixed maximum
//! duration. Pausing never resets `elapsed`; expiry is the terminal check
//! performed by the supervisor each tick.

use super::constants::MAX_TIME_SECONDS;

#[derive(Debug, Clone)]
pub struct MatchClock {
    elapsed: f64,
    running: bool,
    max_seconds: f64,
}

impl Default for MatchClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchClock {
    pub fn new() -> Self {
        Self { elapsed: 0.0, running: false, max_seconds: MAX_TIME_SECONDS }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by one frame. Only accumulates while running.
    pub fn tick(&mut self, frame_delta: f64) {
        if self.running {
            self.elapsed += frame_delta;
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn remaining(&self) -> f64 {
        (self.max_seconds - self.elapsed).max(0.0)
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.max_seconds
    }

    /// Remaining time formatted as zero-padded `mm:ss`, truncated to whole
    /// seconds. This is the timestamp attached to master-log entries.
    pub fn remaining_mmss(&self) -> String {
        let secs = self.remaining() as u64;
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}
