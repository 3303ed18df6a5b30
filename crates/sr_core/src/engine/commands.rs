//! Operator channel vocabulary
//!
//! Inbound ASCII commands from the operator console and the outbound status
//! messages the supervisor broadcasts. Unknown commands and malformed
//! arguments parse to `None` and are dropped without error; they are never
//! match events.

use std::fmt;

use super::telemetry::{RobotId, ROBOT_COUNT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Run,
    Pause,
    Reset,
    LoadController { robot: RobotId, source: String },
    UnloadController { robot: RobotId },
    Relocate { robot: RobotId },
    Quit { robot: RobotId },
}

impl OperatorCommand {
    /// Parse one comma-separated command line. The first token selects the
    /// command; `robotNFile` keeps the remainder verbatim as program source.
    pub fn parse(line: &str) -> Option<Self> {
        let (head, rest) = match line.split_once(',') {
            Some((head, rest)) => (head, Some(rest)),
            None => (line, None),
        };

        match head {
            "run" => Some(OperatorCommand::Run),
            "pause" => Some(OperatorCommand::Pause),
            "reset" => Some(OperatorCommand::Reset),
            "robot0File" => rest.map(|src| OperatorCommand::LoadController {
                robot: 0,
                source: src.to_string(),
            }),
            "robot1File" => rest.map(|src| OperatorCommand::LoadController {
                robot: 1,
                source: src.to_string(),
            }),
            "robot0Unload" => Some(OperatorCommand::UnloadController { robot: 0 }),
            "robot1Unload" => Some(OperatorCommand::UnloadController { robot: 1 }),
            "relocate" => parse_robot_id(rest?).map(|robot| OperatorCommand::Relocate { robot }),
            "quit" => parse_robot_id(rest?).map(|robot| OperatorCommand::Quit { robot }),
            _ => None,
        }
    }
}

fn parse_robot_id(raw: &str) -> Option<RobotId> {
    let id: usize = raw.trim().parse().ok()?;
    (id < ROBOT_COUNT).then_some(id)
}

/// Extract the team name from a controller program source. The loader
/// convention is a `RobotName:<name>` marker; the name runs to end of line.
pub fn extract_robot_name(source: &str) -> Option<String> {
    let start = source.find("RobotName:")? + "RobotName:".len();
    let name = source[start..].lines().next()?.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Outbound status messages, rendered in the operator channel's wire text.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusUpdate {
    Startup,
    Loaded { robot: RobotId, name: String },
    Unloaded { robot: RobotId },
    RobotInSimulation { robot: RobotId },
    RobotNotInSimulation { robot: RobotId },
    /// Both live feeds, each as a comma-separated body.
    HistoryUpdate { feeds: [String; 2] },
    Update { score0: i32, score1: i32, elapsed: f64 },
    Ended,
}

impl fmt::Display for StatusUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusUpdate::Startup => write!(f, "startup"),
            StatusUpdate::Loaded { robot, name } => write!(f, "loaded{},{}", robot, name),
            StatusUpdate::Unloaded { robot } => write!(f, "unloaded{}", robot),
            StatusUpdate::RobotInSimulation { robot } => write!(f, "robotInSimulation{}", robot),
            StatusUpdate::RobotNotInSimulation { robot } => {
                write!(f, "robotNotInSimulation{}", robot)
            }
            StatusUpdate::HistoryUpdate { feeds } => {
                write!(f, "historyUpdate,{}:{}", feeds[0], feeds[1])
            }
            StatusUpdate::Update { score0, score1, elapsed } => {
                write!(f, "update,{},{},{}", score0, score1, elapsed)
            }
            StatusUpdate::Ended => write!(f, "ended"),
        }
    }
}

/// Where outbound status goes. The console prints these; tests collect
/// them in a `Vec`.
pub trait StatusSink {
    fn send(&mut self, update: StatusUpdate);
}

impl StatusSink for Vec<StatusUpdate> {
    fn send(&mut self, update: StatusUpdate) {
        self.push(update);
    }
}

/// Writes and clears robot-controller program files. The program loader
/// itself is an external collaborator; the supervisor only drives it and
/// reports load/unload status.
pub trait ControllerHost {
    fn load(&mut self, robot: RobotId, source: &str);
    fn unload(&mut self, robot: RobotId);
}

/// Host that stores nothing. Used in tests and telemetry-only setups.
#[derive(Debug, Default)]
pub struct NullControllerHost;

impl ControllerHost for NullControllerHost {
    fn load(&mut self, _robot: RobotId, _source: &str) {}
    fn unload(&mut self, _robot: RobotId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(OperatorCommand::parse("run"), Some(OperatorCommand::Run));
        assert_eq!(OperatorCommand::parse("pause"), Some(OperatorCommand::Pause));
        assert_eq!(OperatorCommand::parse("reset"), Some(OperatorCommand::Reset));
    }

    #[test]
    fn test_parse_controller_file_keeps_source_verbatim() {
        let cmd = OperatorCommand::parse("robot0File,# RobotName:Alpha\nmove()").unwrap();
        assert_eq!(
            cmd,
            OperatorCommand::LoadController {
                robot: 0,
                source: "# RobotName:Alpha\nmove()".to_string()
            }
        );
    }

    #[test]
    fn test_parse_relocate_and_quit() {
        assert_eq!(
            OperatorCommand::parse("relocate,1"),
            Some(OperatorCommand::Relocate { robot: 1 })
        );
        assert_eq!(OperatorCommand::parse("quit,0"), Some(OperatorCommand::Quit { robot: 0 }));
    }

    #[test]
    fn test_malformed_commands_are_dropped() {
        assert_eq!(OperatorCommand::parse(""), None);
        assert_eq!(OperatorCommand::parse("unknown"), None);
        assert_eq!(OperatorCommand::parse("relocate"), None);
        assert_eq!(OperatorCommand::parse("relocate,x"), None);
        assert_eq!(OperatorCommand::parse("relocate,7"), None);
        assert_eq!(OperatorCommand::parse("quit,"), None);
        assert_eq!(OperatorCommand::parse("robot0File"), None);
    }

    #[test]
    fn test_extract_robot_name() {
        assert_eq!(
            extract_robot_name("# RobotName:Rescue Rangers\nrest of program"),
            Some("Rescue Rangers".to_string())
        );
        assert_eq!(extract_robot_name("no marker here"), None);
        assert_eq!(extract_robot_name("RobotName:\ncode"), None);
    }

    #[test]
    fn test_status_wire_text() {
        assert_eq!(StatusUpdate::Startup.to_string(), "startup");
        assert_eq!(
            StatusUpdate::Loaded { robot: 0, name: "Alpha".to_string() }.to_string(),
            "loaded0,Alpha"
        );
        assert_eq!(StatusUpdate::Unloaded { robot: 1 }.to_string(), "unloaded1");
        assert_eq!(
            StatusUpdate::RobotInSimulation { robot: 0 }.to_string(),
            "robotInSimulation0"
        );
        assert_eq!(
            StatusUpdate::RobotNotInSimulation { robot: 1 }.to_string(),
            "robotNotInSimulation1"
        );
        assert_eq!(
            StatusUpdate::HistoryUpdate {
                feeds: ["a,b".to_string(), "c".to_string()]
            }
            .to_string(),
            "historyUpdate,a,b:c"
        );
        assert_eq!(
            StatusUpdate::Update { score0: 10, score1: 0, elapsed: 12.352 }.to_string(),
            "update,10,0,12.352"
        );
        assert_eq!(StatusUpdate::Ended.to_string(), "ended");
    }
}
