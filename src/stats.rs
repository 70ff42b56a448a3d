use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::format::{format_duration, used_space_percentage};

/// A server-reported epoch timestamp in milliseconds.
///
/// The backend uses `-1` for "not started / not recording". Anything that is not
/// a number (or a numeric string) is kept as `Invalid` and renders as `N/A`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Timestamp {
    #[default]
    Unset,
    At(i64),
    Invalid,
}

impl Timestamp {
    fn missing() -> Self {
        Timestamp::Invalid
    }

    fn from_number(value: f64) -> Self {
        if !value.is_finite() {
            Timestamp::Invalid
        } else if value == -1.0 {
            Timestamp::Unset
        } else {
            Timestamp::At(value.trunc() as i64)
        }
    }

    /// Elapsed time since this timestamp, or `placeholder` when unset.
    pub fn elapsed_display(&self, now_millis: i64, placeholder: &str) -> String {
        match self {
            Timestamp::Unset => placeholder.to_string(),
            Timestamp::At(start) => format_duration(now_millis.saturating_sub(*start)),
            Timestamp::Invalid => "N/A".to_string(),
        }
    }
}

impl From<Value> for Timestamp {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(number) => number
                .as_f64()
                .map(Timestamp::from_number)
                .unwrap_or(Timestamp::Invalid),
            Value::String(text) => text
                .trim()
                .parse::<f64>()
                .map(Timestamp::from_number)
                .unwrap_or(Timestamp::Invalid),
            _ => Timestamp::Invalid,
        }
    }
}

impl From<Timestamp> for Value {
    fn from(timestamp: Timestamp) -> Self {
        match timestamp {
            Timestamp::Unset => Value::from(-1),
            Timestamp::At(millis) => Value::from(millis),
            Timestamp::Invalid => Value::Null,
        }
    }
}

/// Body of `GET /statistics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStats {
    pub total_space_formatted: String,
    pub free_space_formatted: String,
    pub usable_space_formatted: String,
    pub total_space: u64,
    pub free_space: u64,
    #[serde(default)]
    pub usable_space: Option<u64>,
    #[serde(default = "Timestamp::missing")]
    pub server_start_time_millis: Timestamp,
    #[serde(default = "Timestamp::missing")]
    pub recording_start_time_millis: Timestamp,
}

impl ServerStats {
    pub fn used_space(&self) -> String {
        used_space_percentage(self.total_space, self.free_space)
    }

    pub fn rows(&self) -> Vec<StatRow> {
        vec![
            StatRow::new("Total Space", &self.total_space_formatted),
            StatRow::new("Free Space", &self.free_space_formatted),
            StatRow::new("Usable Space", &self.usable_space_formatted),
            StatRow::new("Space Used", &self.used_space()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    pub label: &'static str,
    pub value: String,
}

impl StatRow {
    fn new(label: &'static str, value: &str) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

/// Contents of the disk statistics region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DiskStatsView {
    #[default]
    Pending,
    Table(Vec<StatRow>),
    Error(String),
}

impl DiskStatsView {
    pub fn error(message: impl std::fmt::Display) -> Self {
        DiskStatsView::Error(format!("Error loading disk statistics: {message}"))
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            DiskStatsView::Pending => vec!["Loading...".to_string()],
            DiskStatsView::Table(rows) => rows
                .iter()
                .map(|row| format!("{}: {}", row.label, row.value))
                .collect(),
            DiskStatsView::Error(message) => vec![message.clone()],
        }
    }
}

/// Server and recording start times, refreshed by every successful statistics fetch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UptimeState {
    pub server_start: Timestamp,
    pub recording_start: Timestamp,
}

impl UptimeState {
    pub fn from_stats(stats: &ServerStats) -> Self {
        Self {
            server_start: stats.server_start_time_millis,
            recording_start: stats.recording_start_time_millis,
        }
    }

    pub fn render(&self, now_millis: i64) -> UptimeView {
        UptimeView {
            server_uptime: self.server_start.elapsed_display(now_millis, "Loading..."),
            recording_uptime: self.recording_start.elapsed_display(now_millis, "Idle"),
            // An unreadable start time still means the recorder reported something
            // other than the idle sentinel.
            recording: self.recording_start != Timestamp::Unset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UptimeView {
    pub server_uptime: String,
    pub recording_uptime: String,
    pub recording: bool,
}
