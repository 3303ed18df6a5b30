//! History Log
//!
//! Two independent containers per robot: a fixed-capacity recent feed for
//! the live operator broadcast and an unbounded timestamped master log for
//! the end-of-match report. They are written together but are otherwise
//! unrelated; the feed evicts, the master log never does.

use std::collections::VecDeque;

/// Live-feed capacity. Oldest entry is evicted once the feed exceeds this.
pub const RECENT_FEED_CAPACITY: usize = 8;

/// Bounded FIFO view of the most recent match events.
#[derive(Debug, Clone, Default)]
pub struct RecentFeed {
    entries: VecDeque<String>,
}

impl RecentFeed {
    pub fn push(&mut self, text: String) {
        self.entries.push_back(text);
        while self.entries.len() > RECENT_FEED_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Comma-separated feed body used by the `historyUpdate` broadcast.
    pub fn to_csv(&self) -> String {
        self.entries.iter().map(String::as_str).collect::<Vec<_>>().join(",")
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// One master-log record: remaining match time at the event, plus the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Remaining time, formatted `mm:ss` at push time.
    pub timestamp: String,
    pub text: String,
}

/// Append-only match record; never truncated.
#[derive(Debug, Clone, Default)]
pub struct MasterLog {
    records: Vec<LogRecord>,
}

impl MasterLog {
    pub fn push(&mut self, timestamp: String, text: String) {
        self.records.push(LogRecord { timestamp, text });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogRecord> {
        self.records.iter()
    }
}

/// Per-robot pairing of the two containers. Every history append goes
/// through `push` so the feed and the master log can never diverge.
#[derive(Debug, Clone, Default)]
pub struct RobotHistory {
    pub recent: RecentFeed,
    pub master: MasterLog,
}

impl RobotHistory {
    /// Append `text` to both containers. `remaining_mmss` is the match
    /// clock's remaining time at the moment of the event.
    pub fn push(&mut self, text: &str, remaining_mmss: &str) {
        self.master.push(remaining_mmss.to_string(), text.to_string());
        self.recent.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_feed_evicts_oldest_beyond_capacity() {
        let mut feed = RecentFeed::default();
        for i in 0..12 {
            feed.push(format!("event {}", i));
        }
        assert_eq!(feed.len(), RECENT_FEED_CAPACITY);
        assert_eq!(feed.iter().next(), Some("event 4"));
        assert_eq!(feed.iter().last(), Some("event 11"));
    }

    #[test]
    fn test_recent_feed_csv() {
        let mut feed = RecentFeed::default();
        feed.push("a".to_string());
        feed.push("b".to_string());
        assert_eq!(feed.to_csv(), "a,b");

        let empty = RecentFeed::default();
        assert_eq!(empty.to_csv(), "");
    }

    #[test]
    fn test_master_log_is_append_only() {
        let mut history = RobotHistory::default();
        for i in 0..20 {
            history.push(&format!("event {}", i), "07:00");
        }
        assert_eq!(history.master.len(), 20);
        assert_eq!(history.recent.len(), RECENT_FEED_CAPACITY);

        let first = history.master.iter().next().unwrap();
        assert_eq!(first.text, "event 0");
        assert_eq!(first.timestamp, "07:00");
    }

    #[test]
    fn test_push_writes_both_containers() {
        let mut history = RobotHistory::default();
        history.push("Found checkpoint  +10", "07:59");

        assert_eq!(history.recent.iter().next(), Some("Found checkpoint  +10"));
        let record = history.master.iter().next().unwrap();
        assert_eq!(record.timestamp, "07:59");
        assert_eq!(record.text, "Found checkpoint  +10");
    }
}
