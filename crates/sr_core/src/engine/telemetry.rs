//! Telemetry interface
//!
//! Wire decoding for robot-controller status packets, the single-slot
//! inbound mailbox, and the capability trait over the external simulation's
//! robot pose/velocity fields. The supervisor checks `present` before any
//! provider call; the provider never has to model an absent robot.

use crate::models::Vec3;

pub type RobotId = usize;
pub const ROBOT_COUNT: usize = 2;

/// Fixed packet length: three 4-byte signed integers plus one type byte.
pub const PACKET_LEN: usize = 13;

/// Type code that signals exit intent rather than a victim estimate.
pub const EXIT_TYPE_CODE: char = 'E';

/// A decoded controller packet. A robot holds at most one unread message;
/// a newer one overwrites an unconsumed one (last-write-wins).
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryMessage {
    pub robot_id: RobotId,
    /// Reported victim position estimate, metres on the ground plane.
    pub estimate: Vec3,
    /// Victim-type hint, or `'E'` for exit intent.
    pub type_code: char,
}

impl TelemetryMessage {
    pub fn is_exit(&self) -> bool {
        self.type_code == EXIT_TYPE_CODE
    }
}

/// Decode a wire packet: little-endian `robot_id`, `x_cm`, `z_cm`, then one
/// ASCII type byte. Returns `None` for anything malformed; bad packets are
/// dropped, never surfaced as match events.
pub fn decode_packet(bytes: &[u8]) -> Option<TelemetryMessage> {
    if bytes.len() != PACKET_LEN {
        return None;
    }

    let robot_id = i32::from_le_bytes(bytes[0..4].try_into().ok()?);
    let x_cm = i32::from_le_bytes(bytes[4..8].try_into().ok()?);
    let z_cm = i32::from_le_bytes(bytes[8..12].try_into().ok()?);
    let code = bytes[12];

    if !(0..ROBOT_COUNT as i32).contains(&robot_id) || !code.is_ascii() {
        return None;
    }

    Some(TelemetryMessage {
        robot_id: robot_id as RobotId,
        estimate: Vec3::new(f64::from(x_cm) / 100.0, 0.0, f64::from(z_cm) / 100.0),
        type_code: code as char,
    })
}

/// Single-slot inbound mailbox for the whole match, polled once per tick.
/// If several packets arrive within one tick gap only the newest survives;
/// that drop policy is deliberate and matches the arena's radio channel.
#[derive(Debug, Default)]
pub struct TelemetryMailbox {
    slot: Option<Vec<u8>>,
}

impl TelemetryMailbox {
    /// Post a raw packet, replacing any unread one.
    pub fn post(&mut self, packet: &[u8]) {
        if self.slot.is_some() {
            log::debug!("telemetry mailbox overwritten before poll");
        }
        self.slot = Some(packet.to_vec());
    }

    /// Take the pending packet, leaving the mailbox empty.
    pub fn take(&mut self) -> Option<Vec<u8>> {
        self.slot.take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

/// Capability interface over the external simulation's per-robot fields.
///
/// Calls are made only for robots currently present in the simulation; the
/// supervisor owns that flag and checks it first.
pub trait TelemetryProvider {
    fn position(&self, robot: RobotId) -> Vec3;
    fn set_position(&mut self, robot: RobotId, pos: Vec3);
    /// Set the robot's heading; relocation always resets it to zero.
    fn set_rotation_yaw(&mut self, robot: RobotId, yaw: f64);
    fn velocity(&self, robot: RobotId) -> Vec3;
    fn set_speed_cap(&mut self, robot: RobotId, cap: f64);
    /// Remove the robot's node from the simulation entirely.
    fn remove(&mut self, robot: RobotId);
}

/// Encode a packet in wire format. Primarily for tests and the console
/// harness; real packets come from the robot controllers.
pub fn encode_packet(robot_id: RobotId, x_cm: i32, z_cm: i32, type_code: char) -> [u8; PACKET_LEN] {
    let mut buf = [0u8; PACKET_LEN];
    buf[0..4].copy_from_slice(&(robot_id as i32).to_le_bytes());
    buf[4..8].copy_from_slice(&x_cm.to_le_bytes());
    buf[8..12].copy_from_slice(&z_cm.to_le_bytes());
    buf[12] = type_code as u8;
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_packet() {
        let buf = encode_packet(0, 152, -340, 'H');
        let msg = decode_packet(&buf).unwrap();
        assert_eq!(msg.robot_id, 0);
        assert_eq!(msg.estimate, Vec3::new(1.52, 0.0, -3.4));
        assert_eq!(msg.type_code, 'H');
        assert!(!msg.is_exit());
    }

    #[test]
    fn test_decode_exit_packet() {
        let buf = encode_packet(1, 0, 0, 'E');
        let msg = decode_packet(&buf).unwrap();
        assert_eq!(msg.robot_id, 1);
        assert!(msg.is_exit());
    }

    #[test]
    fn test_decode_rejects_bad_length() {
        assert!(decode_packet(&[0u8; 12]).is_none());
        assert!(decode_packet(&[0u8; 14]).is_none());
        assert!(decode_packet(&[]).is_none());
    }

    #[test]
    fn test_decode_rejects_bad_robot_id() {
        let buf = encode_packet(5, 0, 0, 'H');
        assert!(decode_packet(&buf).is_none());

        let mut buf = encode_packet(0, 0, 0, 'H');
        buf[0..4].copy_from_slice(&(-1i32).to_le_bytes());
        assert!(decode_packet(&buf).is_none());
    }

    #[test]
    fn test_decode_rejects_non_ascii_type_byte() {
        let mut buf = encode_packet(0, 0, 0, 'H');
        buf[12] = 0xFF;
        assert!(decode_packet(&buf).is_none());
    }

    #[test]
    fn test_mailbox_last_write_wins() {
        let mut mailbox = TelemetryMailbox::default();
        mailbox.post(&encode_packet(0, 100, 100, 'H'));
        mailbox.post(&encode_packet(0, 200, 200, 'U'));

        let packet = mailbox.take().unwrap();
        let msg = decode_packet(&packet).unwrap();
        assert_eq!(msg.type_code, 'U');
        assert!(mailbox.is_empty());
        assert!(mailbox.take().is_none());
    }
}
