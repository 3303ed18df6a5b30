//! Arena Index
//!
//! Static set of axis-aligned rectangular zones built once from the arena
//! configuration. Membership tests are inclusive-bounds containment on the
//! (x, z) plane; checkpoints and swamps are queried as independent passes.

use serde::{Deserialize, Serialize};

/// A point or vector in arena space. `y` is vertical; zone containment only
/// looks at the (x, z) ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance on the ground plane, ignoring `y`.
    pub fn ground_distance(&self, other: Vec3) -> f64 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Checkpoint,
    Swamp,
    Start,
}

/// Stable identity of a zone within the arena index.
///
/// Visited-zone bookkeeping is keyed on this id, never on re-derived
/// coordinates, so once-per-zone credit cannot depend on float equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub usize);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub kind: ZoneKind,
    /// Minimum corner on the (x, z) plane.
    pub min: (f64, f64),
    /// Maximum corner on the (x, z) plane.
    pub max: (f64, f64),
    /// Center of the zone; used as relocation target for checkpoints.
    pub center: Vec3,
}

impl Zone {
    /// Inclusive-bounds containment on the ground plane.
    pub fn contains(&self, pos: Vec3) -> bool {
        pos.x >= self.min.0 && pos.x <= self.max.0 && pos.z >= self.min.1 && pos.z <= self.max.1
    }
}

/// Immutable zone index, built once at match initialization.
#[derive(Debug, Clone, Default)]
pub struct ArenaIndex {
    zones: Vec<Zone>,
}

impl ArenaIndex {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    pub fn zone(&self, id: ZoneId) -> &Zone {
        &self.zones[id.0]
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// First checkpoint containing `pos`, in stable index order.
    pub fn checkpoint_containing(&self, pos: Vec3) -> Option<(ZoneId, &Zone)> {
        self.containing(ZoneKind::Checkpoint, pos)
    }

    /// First swamp containing `pos`, in stable index order.
    pub fn swamp_containing(&self, pos: Vec3) -> Option<(ZoneId, &Zone)> {
        self.containing(ZoneKind::Swamp, pos)
    }

    /// First start zone in index order. Config validation guarantees one.
    pub fn first_start_zone(&self) -> Option<(ZoneId, &Zone)> {
        self.iter_kind(ZoneKind::Start).next()
    }

    pub fn iter_kind(&self, kind: ZoneKind) -> impl Iterator<Item = (ZoneId, &Zone)> {
        self.zones
            .iter()
            .enumerate()
            .filter(move |(_, z)| z.kind == kind)
            .map(|(i, z)| (ZoneId(i), z))
    }

    fn containing(&self, kind: ZoneKind, pos: Vec3) -> Option<(ZoneId, &Zone)> {
        self.iter_kind(kind).find(|(_, z)| z.contains(pos))
    }
}
