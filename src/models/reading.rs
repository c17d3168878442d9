use serde::{Deserialize, Serialize};

/// Local timestamp layout used in the log file and the API, e.g. `2024-05-01 14:03:22`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One validated sample as logged and returned over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: String,
    pub temperature: f64,
    pub humidity: f64,
}

impl Reading {
    pub fn new(timestamp: impl Into<String>, temperature: f64, humidity: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            temperature,
            humidity,
        }
    }
}

/// Rounds to one fractional digit, half away from zero.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
