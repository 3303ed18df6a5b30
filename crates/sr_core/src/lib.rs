//! # sr_core - Rescue Arena Match Supervisor
//!
//! Authoritative match-scoring and state-supervision engine for a timed,
//! two-robot search-and-rescue arena competition. It consumes per-tick
//! telemetry (robot pose and velocity, wireless controller packets) and
//! produces a running score, an auditable event history, and outbound
//! operator status.
//!
//! ## Design
//! - Single-threaded cooperative loop: one evaluation pass per fixed
//!   32 ms simulation tick, fixed ordering within a tick
//! - All match state lives in one explicit [`MatchSupervisor`] context;
//!   the physics simulation, controller loader, and operator transport are
//!   external collaborators behind capability traits
//! - Nothing in the engine is fatal to the match: absent robots are
//!   no-ops, malformed input is dropped, a failed report write is warned
//!   about and ignored

pub mod engine;
pub mod error;
pub mod models;
pub mod report;

pub use engine::{
    ControllerHost, MatchClock, MatchSupervisor, NullControllerHost, OperatorCommand, RobotId,
    RobotState, StatusSink, StatusUpdate, TelemetryMessage, TelemetryProvider, ROBOT_COUNT,
};
pub use error::{ConfigError, ReportError};
pub use models::{
    ArenaConfig, ArenaIndex, Facing, Vec3, Victim, VictimKind, VictimRegistry, Zone, ZoneId,
    ZoneKind,
};
pub use report::ReportWriter;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
