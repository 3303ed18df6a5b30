pub mod arena;
pub mod config;
pub mod victim;

pub use arena::{ArenaIndex, Vec3, Zone, ZoneId, ZoneKind};
pub use config::{ArenaConfig, VictimConfig, ZoneConfig, CONFIG_SCHEMA_VERSION};
pub use victim::{Facing, Victim, VictimKind, VictimRegistry, IDENTIFICATION_RADIUS};
