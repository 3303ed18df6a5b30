//! Arena Configuration
//!
//! Schema-versioned JSON document supplied by the arena configuration
//! loader at match initialization: zone rectangles and victim placements.
//! The engine builds its immutable `ArenaIndex` and `VictimRegistry` from
//! this once; nothing else mutates them afterwards.

use serde::{Deserialize, Serialize};

use super::arena::{ArenaIndex, Vec3, Zone, ZoneKind};
use super::victim::{Facing, Victim, VictimKind, VictimRegistry};
use crate::error::ConfigError;

pub const CONFIG_SCHEMA_VERSION: u8 = 1;

fn default_schema_version() -> u8 {
    CONFIG_SCHEMA_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub kind: ZoneKind,
    /// Minimum corner on the (x, z) plane.
    pub min: (f64, f64),
    /// Maximum corner on the (x, z) plane.
    pub max: (f64, f64),
    /// Height of the zone center, defaults to floor level.
    #[serde(default)]
    pub center_y: f64,
}

impl ZoneConfig {
    fn to_zone(&self) -> Zone {
        Zone {
            kind: self.kind,
            min: self.min,
            max: self.max,
            center: Vec3::new(
                (self.min.0 + self.max.0) / 2.0,
                self.center_y,
                (self.min.1 + self.max.1) / 2.0,
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VictimConfig {
    pub position: Vec3,
    /// Heading of the victim prop in radians; quantized to a cardinal
    /// facing at build time.
    pub yaw: f64,
    #[serde(rename = "type")]
    pub kind: VictimKind,
    pub score_value: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    pub zones: Vec<ZoneConfig>,
    #[serde(default)]
    pub victims: Vec<VictimConfig>,
}

impl ArenaConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: ArenaConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_version != CONFIG_SCHEMA_VERSION {
            return Err(ConfigError::SchemaVersion {
                found: self.schema_version,
                expected: CONFIG_SCHEMA_VERSION,
            });
        }
        for (index, zone) in self.zones.iter().enumerate() {
            if zone.min.0 > zone.max.0 || zone.min.1 > zone.max.1 {
                return Err(ConfigError::InvertedZoneBounds { index });
            }
        }
        if !self.zones.iter().any(|z| z.kind == ZoneKind::Start) {
            return Err(ConfigError::MissingStartZone);
        }
        Ok(())
    }

    pub fn build_arena(&self) -> ArenaIndex {
        ArenaIndex::new(self.zones.iter().map(ZoneConfig::to_zone).collect())
    }

    pub fn build_victims(&self) -> VictimRegistry {
        VictimRegistry::new(
            self.victims
                .iter()
                .enumerate()
                .map(|(id, v)| Victim {
                    id,
                    position: v.position,
                    facing: Facing::from_yaw(v.yaw),
                    kind: v.kind.clone(),
                    score_value: v.score_value,
                    identified: false,
                })
                .collect(),
        )
    }
}
