//! Match report
//!
//! Plain-text end-of-match record: a short header followed by the master
//! log, one `<mm:ss> <event text>` line per entry. The format lives here;
//! writing it anywhere is the caller's concern, and a failed write is
//! recovered locally without touching the match outcome.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::engine::constants::MAX_TIME_MINUTES;
use crate::engine::robot::RobotState;
use crate::error::ReportError;

/// Render the report for robot 0, the scored competition slot.
pub fn render(robot: &RobotState) -> String {
    let mut out = String::new();
    out.push_str(&format!("GAME_DURATION: {}:00\n", MAX_TIME_MINUTES));
    out.push_str(&format!("ROBOT_0_SCORE: {}\n", robot.score()));
    out.push('\n');
    out.push_str(&format!("ROBOT_0: {}\n", robot.name));
    for record in robot.history.master.iter() {
        out.push_str(&format!("{} {}\n", record.timestamp, record.text));
    }
    out.push('\n');
    out
}

/// File name for a report written at `now`, unique to the second.
pub fn file_name(now: DateTime<Local>) -> String {
    now.format("log %m-%d-%y %H,%M,%S.txt").to_string()
}

/// Writes rendered reports into a log directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `contents` as a timestamped report file, returning its path.
    pub fn write(&self, contents: &str) -> Result<PathBuf, ReportError> {
        let path = self.dir.join(file_name(Local::now()));
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_layout() {
        let mut robot = RobotState::new();
        robot.name = "Rescue Rangers".to_string();
        crate::engine::scoring::apply_delta(&mut robot, 25);
        robot.history.push("Found checkpoint  +10", "07:58");
        robot.history.push("Entered swamp", "07:40");

        let report = render(&robot);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "GAME_DURATION: 8:00");
        assert_eq!(lines[1], "ROBOT_0_SCORE: 25");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "ROBOT_0: Rescue Rangers");
        assert_eq!(lines[4], "07:58 Found checkpoint  +10");
        assert_eq!(lines[5], "07:40 Entered swamp");
    }

    #[test]
    fn test_report_with_empty_log() {
        let robot = RobotState::new();
        let report = render(&robot);
        assert!(report.contains("ROBOT_0_SCORE: 0"));
        assert!(report.contains("ROBOT_0: NO_TEAM_NAME"));
    }

    #[test]
    fn test_file_name_format() {
        let when = Local.with_ymd_and_hms(2026, 3, 7, 14, 5, 9).unwrap();
        assert_eq!(file_name(when), "log 03-07-26 14,05,09.txt");
    }

    #[test]
    fn test_writer_persists_report() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path());

        let mut robot = RobotState::new();
        robot.history.push("Found checkpoint  +10", "07:58");

        let path = writer.write(&render(&robot)).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("GAME_DURATION: 8:00"));
        assert!(contents.contains("07:58 Found checkpoint  +10"));
    }

    #[test]
    fn test_writer_error_on_missing_directory() {
        let writer = ReportWriter::new("/nonexistent/sr-report-dir");
        assert!(writer.write("report body").is_err());
    }
}
