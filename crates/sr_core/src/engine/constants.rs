//! Match timing and motion constants.
//!
//! All durations are simulated time, advanced in fixed ticks by the
//! supervisor; nothing here is wall-clock.

/// Simulated time per evaluation pass (32 ms).
pub const TICK_SECONDS: f64 = 0.032;

/// Maximum match duration.
pub const MAX_TIME_MINUTES: u64 = 8;
pub const MAX_TIME_SECONDS: f64 = (MAX_TIME_MINUTES * 60) as f64;

/// Default speed cap restored when a robot leaves a swamp.
pub const DEFAULT_MAX_SPEED: f64 = 6.28;

/// Reduced speed cap applied while inside a swamp.
pub const SWAMP_MAX_SPEED: f64 = 2.0;

/// Per-axis velocity magnitude below which a robot counts as stopped.
pub const STALL_EPSILON: f64 = 0.01;

/// Continuous stall time that triggers relocation and the penalty.
pub const STALL_RELOCATE_SECONDS: f64 = 20.0;

/// Continuous stall time required before a victim message is evaluated.
pub const IDENT_HOLD_SECONDS: f64 = 3.0;

/// Vertical placement (floor height) when a robot is put back on a
/// checkpoint after relocation.
pub const RELOCATE_Y_OFFSET: f64 = -0.0751;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_duration() {
        assert_eq!(MAX_TIME_SECONDS, 480.0);
    }

    #[test]
    fn test_ticks_per_match() {
        // 480s / 0.032s = 15000 evaluation passes per full match
        let ticks = (MAX_TIME_SECONDS / TICK_SECONDS) as u64;
        assert_eq!(ticks, 15000);
    }

    #[test]
    fn test_ident_hold_shorter_than_relocation() {
        assert!(IDENT_HOLD_SECONDS < STALL_RELOCATE_SECONDS);
    }
}
