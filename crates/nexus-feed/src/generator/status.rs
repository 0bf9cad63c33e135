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

//! System status snapshot generator.

use std::ops::Range;

use chrono::{DateTime, Duration, Local, Utc};
use rand::Rng;

use super::Generator;
use crate::model::{
    LogEntry, LogKind, StatusSnapshot, SystemRecord, SystemStatus, LATENCY_PLACEHOLDER,
};

/// Probability that the sales portal reports maintenance on a given draw.
const MAINTENANCE_PROBABILITY: f64 = 0.2;

/// Fixed subsystem ids, in snapshot order.
pub const SYSTEM_IDS: [&str; 4] = ["isdn-core", "rdc-nexus", "sales-portal", "auth-sso"];

/// Static description of one simulated subsystem.
struct SystemTemplate {
    id: &'static str,
    name: &'static str,
    uptime: &'static str,
    description: &'static str,
    /// Latency range in milliseconds (half-open).
    latency: Range<u32>,
    /// Chance of reporting maintenance instead of online.
    maintenance_chance: Option<f64>,
}

const SYSTEMS: [SystemTemplate; 4] = [
    SystemTemplate {
        id: "isdn-core",
        name: "ISDN Logistics Core",
        uptime: "99.98%",
        description: "Supply chain management & tracking system.",
        latency: 15..30,
        maintenance_chance: None,
    },
    SystemTemplate {
        id: "rdc-nexus",
        name: "RDC Inventory Nexus",
        uptime: "100%",
        description: "Real-time stock synchronization across regions.",
        latency: 8..18,
        maintenance_chance: None,
    },
    SystemTemplate {
        id: "sales-portal",
        name: "Sales Representative Portal",
        uptime: "98.5%",
        description: "Order entry and customer relationship management.",
        latency: 30..50,
        maintenance_chance: Some(MAINTENANCE_PROBABILITY),
    },
    SystemTemplate {
        id: "auth-sso",
        name: "Auth Layer (SSO)",
        uptime: "99.99%",
        description: "Unified identity provider for the ecosystem.",
        latency: 40..50,
        maintenance_chance: None,
    },
];

/// Rolling log templates: (seconds before now, message, kind).
const LOG_TEMPLATES: [(i64, &str, LogKind); 4] = [
    (0, "ISDN Core: Syncing 142 localized ledger entries...", LogKind::Info),
    (60, "RDC Nexus: Region 'West-1' integrity check PASSED.", LogKind::Success),
    (120, "SSO Provider: New identity token issued for user ID [vnt_094].", LogKind::Info),
    (300, "WARNING: Latency spike detected in 'Creative' asset delivery network.", LogKind::Warning),
];

/// Format an instant as a local 12-hour clock time, e.g. "3:04:05 PM".
pub(crate) fn format_clock_time(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%-I:%M:%S %p").to_string()
}

/// Generator for the system status feed.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusGenerator;

impl StatusGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn generate_record<R: Rng + ?Sized>(template: &SystemTemplate, rng: &mut R) -> SystemRecord {
        // One draw decides both fields so a maintenance record never shows a latency
        let in_maintenance = template
            .maintenance_chance
            .is_some_and(|p| rng.gen_bool(p));

        let (status, latency) = if in_maintenance {
            (SystemStatus::Maintenance, LATENCY_PLACEHOLDER.to_string())
        } else {
            let ms = rng.gen_range(template.latency.clone());
            (SystemStatus::Online, format!("{ms}ms"))
        };

        SystemRecord {
            id: template.id.to_string(),
            name: template.name.to_string(),
            status,
            uptime: template.uptime.to_string(),
            latency,
            description: template.description.to_string(),
        }
    }
}

impl Generator for StatusGenerator {
    type Snapshot = StatusSnapshot;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> StatusSnapshot {
        let systems = SYSTEMS
            .iter()
            .map(|template| Self::generate_record(template, rng))
            .collect();

        let logs = LOG_TEMPLATES
            .iter()
            .map(|&(offset, msg, kind)| LogEntry {
                time: format_clock_time(now - Duration::seconds(offset)),
                msg: msg.to_string(),
                kind,
            })
            .collect();

        StatusSnapshot { systems, logs }
    }
}
