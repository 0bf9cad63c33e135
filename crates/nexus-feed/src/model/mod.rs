// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Wire model for the simulated feeds.
//!
//! These types are serialized as the JSON bodies of the status and pulse
//! endpoints. Nothing here is persisted: a snapshot lives for the duration of
//! one response and is rebuilt from scratch on the next request.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Placeholder latency shown while a subsystem is in maintenance.
pub const LATENCY_PLACEHOLDER: &str = "--";

/// Health state of a simulated subsystem.
///
/// The generator only ever emits `Online` or `Maintenance`; the other two
/// variants exist so consumers can deserialize any value the wire allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    Online,
    Maintenance,
    Offline,
    Syncing,
}

impl SystemStatus {
    /// Get the wire name of this status
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemStatus::Online => "online",
            SystemStatus::Maintenance => "maintenance",
            SystemStatus::Offline => "offline",
            SystemStatus::Syncing => "syncing",
        }
    }
}

/// One subsystem's health snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemRecord {
    /// Stable identifier, unique within a snapshot.
    pub id: String,
    /// Display label.
    pub name: String,
    pub status: SystemStatus,
    /// Formatted percentage, display only.
    pub uptime: String,
    /// Formatted milliseconds (e.g. "23ms") or [`LATENCY_PLACEHOLDER`].
    pub latency: String,
    pub description: String,
}

impl SystemRecord {
    /// Parse the numeric part of the latency string.
    ///
    /// Returns `None` for the maintenance placeholder or any value that is
    /// not of the form `<integer>ms`.
    #[must_use]
    pub fn latency_ms(&self) -> Option<u32> {
        self.latency.strip_suffix("ms")?.parse().ok()
    }
}

/// Display category for a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Success,
    Warning,
}

/// A rolling activity line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Local clock time, relative to the generation instant.
    pub time: String,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: LogKind,
}

/// Full body of the system status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub systems: Vec<SystemRecord>,
    pub logs: Vec<LogEntry>,
}

impl StatusSnapshot {
    /// Find a record by its id
    #[must_use]
    pub fn system(&self, id: &str) -> Option<&SystemRecord> {
        self.systems.iter().find(|s| s.id == id)
    }

    /// Number of subsystems reporting online
    #[must_use]
    pub fn online_count(&self) -> usize {
        self.systems
            .iter()
            .filter(|s| s.status == SystemStatus::Online)
            .count()
    }
}

/// Direction flag of the market pulse. Carries no relation to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketTrend {
    Bullish,
    Bearish,
}

impl MarketTrend {
    /// Get the wire name of this trend
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketTrend::Bullish => "bullish",
            MarketTrend::Bearish => "bearish",
        }
    }
}

/// Write an instant as RFC 3339 UTC with millisecond precision.
fn serialize_millis<S: Serializer>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Full body of the market pulse endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseSnapshot {
    /// Uniform in [0.5, 1.0].
    pub pulse_score: f64,
    pub market_trend: MarketTrend,
    /// Uniform integer in [10, 59].
    pub commit_density: u32,
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
    /// Fixed banner text.
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&SystemStatus::Maintenance).unwrap();
        assert_eq!(json, "\"maintenance\"");
        assert_eq!(SystemStatus::Syncing.as_str(), "syncing");

        let parsed: SystemStatus = serde_json::from_str("\"offline\"").unwrap();
        assert_eq!(parsed, SystemStatus::Offline);
    }

    #[test]
    fn test_log_entry_uses_type_key() {
        let entry = LogEntry {
            time: "10:00:00 AM".to_string(),
            msg: "hello".to_string(),
            kind: LogKind::Warning,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "warning");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_pulse_camel_case_keys() {
        let pulse = PulseSnapshot {
            pulse_score: 0.75,
            market_trend: MarketTrend::Bullish,
            commit_density: 42,
            timestamp: Utc::now(),
            status: "Active Intelligence Synchronized".to_string(),
        };
        let value = serde_json::to_value(&pulse).unwrap();
        assert_eq!(value["pulseScore"], 0.75);
        assert_eq!(value["marketTrend"], "bullish");
        assert_eq!(value["commitDensity"], 42);
        assert_eq!(MarketTrend::Bearish.as_str(), "bearish");
    }

    #[test]
    fn test_pulse_timestamp_has_millisecond_precision() {
        use chrono::TimeZone;

        let instant = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let pulse = PulseSnapshot {
            pulse_score: 0.5,
            market_trend: MarketTrend::Bearish,
            commit_density: 10,
            timestamp: instant,
            status: String::new(),
        };

        let value = serde_json::to_value(&pulse).unwrap();
        assert_eq!(value["timestamp"], "2026-10-16T12:00:00.123Z");

        // Decodes back, truncated to the millisecond
        let decoded: PulseSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.timestamp.timestamp_subsec_millis(), 123);
        assert_eq!(decoded.timestamp.timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn test_latency_ms() {
        let mut record = SystemRecord {
            id: "isdn-core".to_string(),
            name: "ISDN Logistics Core".to_string(),
            status: SystemStatus::Online,
            uptime: "99.98%".to_string(),
            latency: "23ms".to_string(),
            description: String::new(),
        };
        assert_eq!(record.latency_ms(), Some(23));

        record.latency = LATENCY_PLACEHOLDER.to_string();
        assert_eq!(record.latency_ms(), None);
    }
}
