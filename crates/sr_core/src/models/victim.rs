//! Victim Registry
//!
//! Fixed set of scorable victims created at match initialization. The only
//! mutable field is `identified`, which transitions false -> true exactly
//! once; identified victims are skipped by every later evaluation.

use serde::{Deserialize, Serialize};

use super::arena::Vec3;

/// Maximum distance, on the ground plane, for a robot's physical position
/// (and independently its reported estimate) to count as "at" a victim.
pub const IDENTIFICATION_RADIUS: f64 = 0.15;

/// Canonical victim type. Unknown config strings are preserved verbatim so
/// a custom arena can still type-match against its own codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VictimKind {
    Harmed,
    Unharmed,
    Stable,
    /// Temperature victim.
    Heat,
    Other(String),
}

impl VictimKind {
    /// One-character wire code used by robot controllers.
    pub fn code(&self) -> &str {
        match self {
            VictimKind::Harmed => "H",
            VictimKind::Unharmed => "U",
            VictimKind::Stable => "S",
            VictimKind::Heat => "T",
            VictimKind::Other(raw) => raw,
        }
    }

    /// Case-insensitive match against a reported type code.
    pub fn matches_code(&self, reported: char) -> bool {
        let code = self.code();
        code.len() == 1
            && code
                .chars()
                .next()
                .is_some_and(|c| c.eq_ignore_ascii_case(&reported))
    }
}

impl From<String> for VictimKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "harmed" => VictimKind::Harmed,
            "unharmed" => VictimKind::Unharmed,
            "stable" => VictimKind::Stable,
            "heat" => VictimKind::Heat,
            _ => VictimKind::Other(raw),
        }
    }
}

impl From<VictimKind> for String {
    fn from(kind: VictimKind) -> Self {
        match kind {
            VictimKind::Harmed => "harmed".to_string(),
            VictimKind::Unharmed => "unharmed".to_string(),
            VictimKind::Stable => "stable".to_string(),
            VictimKind::Heat => "heat".to_string(),
            VictimKind::Other(raw) => raw,
        }
    }
}

/// Which side of a victim is visible, quantized from its yaw to the nearest
/// cardinal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    PosX,
    NegX,
    PosZ,
    NegZ,
}

impl Facing {
    /// Quantize a yaw angle (radians) to the nearest cardinal facing.
    ///
    /// Convention, matching the arena's victim props:
    ///   -pi/2 -> +X side visible, +pi/2 -> -X, pi -> +Z, 0 -> -Z.
    pub fn from_yaw(yaw: f64) -> Self {
        use std::f64::consts::{FRAC_PI_2, PI};

        // Wrap into (-pi, pi], then round to the nearest quarter turn.
        let mut a = yaw % (2.0 * PI);
        if a <= -PI {
            a += 2.0 * PI;
        } else if a > PI {
            a -= 2.0 * PI;
        }

        match (a / FRAC_PI_2).round() as i64 {
            -1 => Facing::PosX,
            0 => Facing::NegZ,
            1 => Facing::NegX,
            // -2 and 2 are the same heading (pi).
            _ => Facing::PosZ,
        }
    }

    /// True when `observer` stands on the side this facing designates as
    /// visible, relative to `anchor`.
    pub fn is_visible_from(&self, anchor: Vec3, observer: Vec3) -> bool {
        match self {
            Facing::PosX => observer.x > anchor.x,
            Facing::NegX => observer.x < anchor.x,
            Facing::PosZ => observer.z > anchor.z,
            Facing::NegZ => observer.z < anchor.z,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Victim {
    pub id: usize,
    pub position: Vec3,
    pub facing: Facing,
    pub kind: VictimKind,
    pub score_value: i32,
    pub identified: bool,
}

impl Victim {
    /// Whether `pos` lies within the identification radius of this victim.
    pub fn within_radius(&self, pos: Vec3) -> bool {
        self.position.ground_distance(pos) <= IDENTIFICATION_RADIUS
    }

    /// Whether `pos` is on the victim's visible side.
    pub fn on_visible_side(&self, pos: Vec3) -> bool {
        self.facing.is_visible_from(self.position, pos)
    }
}

/// All victims of the match, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct VictimRegistry {
    victims: Vec<Victim>,
}

impl VictimRegistry {
    pub fn new(victims: Vec<Victim>) -> Self {
        Self { victims }
    }

    pub fn len(&self) -> usize {
        self.victims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.victims.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Victim> {
        self.victims.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Victim> {
        self.victims.iter_mut()
    }

    pub fn get(&self, id: usize) -> Option<&Victim> {
        self.victims.get(id)
    }

    pub fn identified_count(&self) -> usize {
        self.victims.iter().filter(|v| v.identified).count()
    }

    /// Clear every identified flag. Used by match reset only.
    pub fn reset_identified(&mut self) {
        for victim in &mut self.victims {
            victim.identified = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn victim_at(x: f64, z: f64, facing: Facing) -> Victim {
        Victim {
            id: 0,
            position: Vec3::new(x, 0.0, z),
            facing,
            kind: VictimKind::Harmed,
            score_value: 15,
            identified: false,
        }
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(VictimKind::Harmed.code(), "H");
        assert_eq!(VictimKind::Unharmed.code(), "U");
        assert_eq!(VictimKind::Stable.code(), "S");
        assert_eq!(VictimKind::Heat.code(), "T");
        assert_eq!(VictimKind::Other("X".to_string()).code(), "X");
    }

    #[test]
    fn test_kind_code_match_is_case_insensitive() {
        assert!(VictimKind::Harmed.matches_code('h'));
        assert!(VictimKind::Harmed.matches_code('H'));
        assert!(!VictimKind::Harmed.matches_code('U'));
        // Multi-character custom codes never match a single wire byte.
        assert!(!VictimKind::Other("XY".to_string()).matches_code('X'));
    }

    #[test]
    fn test_kind_roundtrip_through_config_string() {
        for raw in ["harmed", "unharmed", "stable", "heat", "frozen"] {
            let kind = VictimKind::from(raw.to_string());
            assert_eq!(String::from(kind), raw);
        }
    }

    #[test]
    fn test_facing_quantization() {
        assert_eq!(Facing::from_yaw(-FRAC_PI_2), Facing::PosX);
        assert_eq!(Facing::from_yaw(FRAC_PI_2), Facing::NegX);
        assert_eq!(Facing::from_yaw(PI), Facing::PosZ);
        assert_eq!(Facing::from_yaw(0.0), Facing::NegZ);

        // Slightly-off prop headings snap to the nearest cardinal.
        assert_eq!(Facing::from_yaw(-1.57), Facing::PosX);
        assert_eq!(Facing::from_yaw(3.14), Facing::PosZ);
        assert_eq!(Facing::from_yaw(-PI), Facing::PosZ);
        assert_eq!(Facing::from_yaw(0.1), Facing::NegZ);
    }

    #[test]
    fn test_visible_side() {
        let v = victim_at(1.0, 1.0, Facing::PosX);
        assert!(v.on_visible_side(Vec3::new(1.5, 0.0, 1.0)));
        assert!(!v.on_visible_side(Vec3::new(0.5, 0.0, 1.0)));

        let v = victim_at(1.0, 1.0, Facing::NegZ);
        assert!(v.on_visible_side(Vec3::new(1.0, 0.0, 0.2)));
        assert!(!v.on_visible_side(Vec3::new(1.0, 0.0, 1.8)));
    }

    #[test]
    fn test_within_radius_boundary() {
        let v = victim_at(0.0, 0.0, Facing::PosX);
        assert!(v.within_radius(Vec3::new(0.15, 0.0, 0.0)));
        assert!(v.within_radius(Vec3::new(0.1, 5.0, 0.1)));
        assert!(!v.within_radius(Vec3::new(0.16, 0.0, 0.0)));
    }

    #[test]
    fn test_registry_reset_identified() {
        let mut registry = VictimRegistry::new(vec![
            victim_at(0.0, 0.0, Facing::PosX),
            victim_at(1.0, 1.0, Facing::NegZ),
        ]);
        for v in registry.iter_mut() {
            v.identified = true;
        }
        assert_eq!(registry.identified_count(), 2);

        registry.reset_identified();
        assert_eq!(registry.identified_count(), 0);
    }
}
