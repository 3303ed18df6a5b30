//! Error types for configuration loading and report persistence. Nothing
//! inside a running match is fatal; these only surface at initialization
//! and at report-write time.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Schema version mismatch: found {found}, expected {expected}")]
    SchemaVersion { found: u8, expected: u8 },

    #[error("Arena has no start zone")]
    MissingStartZone,

    #[error("Zone {index} has inverted bounds")]
    InvertedZoneBounds { index: usize },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
