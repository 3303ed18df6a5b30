//! Match supervision engine.
//!
//! One evaluation pass per fixed 32 ms simulation tick, orchestrated by
//! [`MatchSupervisor`]. Leaf components (clock, history, robot state,
//! scoring, telemetry decode) are independent and individually tested.

pub mod clock;
pub mod commands;
pub mod constants;
pub mod history;
pub mod robot;
pub mod scoring;
pub mod supervisor;
pub mod telemetry;

pub use clock::MatchClock;
pub use commands::{
    extract_robot_name, ControllerHost, NullControllerHost, OperatorCommand, StatusSink,
    StatusUpdate,
};
pub use constants::{
    DEFAULT_MAX_SPEED, IDENT_HOLD_SECONDS, MAX_TIME_MINUTES, MAX_TIME_SECONDS,
    RELOCATE_Y_OFFSET, STALL_EPSILON, STALL_RELOCATE_SECONDS, SWAMP_MAX_SPEED, TICK_SECONDS,
};
pub use history::{LogRecord, MasterLog, RecentFeed, RobotHistory, RECENT_FEED_CAPACITY};
pub use robot::{RobotState, StallTracker, DEFAULT_TEAM_NAME};
pub use scoring::{apply_delta, exit_completion_bonus, score_event};
pub use supervisor::MatchSupervisor;
pub use telemetry::{
    decode_packet, encode_packet, RobotId, TelemetryMailbox, TelemetryMessage, TelemetryProvider,
    EXIT_TYPE_CODE, PACKET_LEN, ROBOT_COUNT,
};
