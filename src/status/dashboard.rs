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

use chrono::{DateTime, Local, Utc};
use std::collections::{HashMap, VecDeque};
use std::fmt::Write;

use nexus_feed::{FeedView, LogKind, PulseSnapshot, StatusSnapshot, SystemStatus};

const MAX_DIAGNOSTICS: usize = 20;

/// Diagnostic message with timestamp
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub timestamp: DateTime<Utc>,
    pub level: DiagnosticLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

impl DiagnosticLevel {
    fn tag(self) -> &'static str {
        match self {
            DiagnosticLevel::Info => "INFO",
            DiagnosticLevel::Warning => "WARN",
        }
    }
}

/// Text dashboard for the polled feeds.
///
/// Holds only display bookkeeping: the snapshots themselves live in the
/// pollers' feed views and are passed in on every render. Fetch failures
/// never show up here; the poller logs them and the last snapshot stays on
/// screen.
pub struct Dashboard {
    diagnostics: VecDeque<DiagnosticMessage>,
    max_diagnostics: usize,
    // Last status seen per subsystem id
    system_states: HashMap<String, SystemStatus>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            diagnostics: VecDeque::with_capacity(MAX_DIAGNOSTICS),
            max_diagnostics: MAX_DIAGNOSTICS,
            system_states: HashMap::new(),
        }
    }

    /// Add a diagnostic message
    pub fn add_diagnostic(&mut self, level: DiagnosticLevel, message: String) {
        self.diagnostics.push_back(DiagnosticMessage {
            timestamp: Utc::now(),
            level,
            message,
        });

        // Keep only the last N messages
        while self.diagnostics.len() > self.max_diagnostics {
            self.diagnostics.pop_front();
        }
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.diagnostics.iter()
    }

    /// Record subsystem transitions visible in a new status view
    pub fn observe_status(&mut self, view: &FeedView<StatusSnapshot>) {
        let Some(snapshot) = &view.snapshot else {
            return;
        };

        let mut changes = Vec::new();
        for system in &snapshot.systems {
            let previous = self.system_states.insert(system.id.clone(), system.status);
            if let Some(previous) = previous {
                if previous != system.status {
                    changes.push((system.name.clone(), previous, system.status));
                }
            }
        }

        for (name, from, to) in changes {
            let level = if to == SystemStatus::Online {
                DiagnosticLevel::Info
            } else {
                DiagnosticLevel::Warning
            };
            self.add_diagnostic(level, format!("{name}: {} -> {}", from.as_str(), to.as_str()));
        }
    }

    /// Render both feeds as a block of text.
    ///
    /// Only the very first fetch of a feed shows a loading line. After that
    /// the last snapshot is shown, or nothing if none ever arrived.
    pub fn render(
        &self,
        status: &FeedView<StatusSnapshot>,
        pulse: &FeedView<PulseSnapshot>,
    ) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== The Digital Nexus ==");

        match (&pulse.snapshot, pulse.loading) {
            (Some(p), _) => {
                let _ = writeln!(
                    out,
                    "Pulse {:.2} ({}) | {} commits/day | {}",
                    p.pulse_score,
                    p.market_trend.as_str(),
                    p.commit_density,
                    p.status
                );
            }
            (None, true) => {
                let _ = writeln!(out, "Pulse: syncing...");
            }
            (None, false) => {}
        }

        let Some(snapshot) = &status.snapshot else {
            if status.loading {
                let _ = writeln!(out, "Loading system status...");
            }
            self.render_diagnostics(&mut out);
            return out;
        };

        let _ = writeln!(
            out,
            "\nSystems ({}/{} online){}",
            snapshot.online_count(),
            snapshot.systems.len(),
            status
                .updated_at
                .map(|t| format!(", updated {}", t.with_timezone(&Local).format("%H:%M:%S")))
                .unwrap_or_default()
        );
        for system in &snapshot.systems {
            let _ = writeln!(
                out,
                "  [{:<11}] {:<30} {:>6} {:>7}",
                system.status.as_str(),
                system.name,
                system.latency,
                system.uptime
            );
        }

        let _ = writeln!(out, "\nActivity");
        for entry in &snapshot.logs {
            let kind = match entry.kind {
                LogKind::Info => "info",
                LogKind::Success => "ok",
                LogKind::Warning => "warn",
            };
            let _ = writeln!(out, "  {:>11} [{:<4}] {}", entry.time, kind, entry.msg);
        }

        self.render_diagnostics(&mut out);
        out
    }

    fn render_diagnostics(&self, out: &mut String) {
        if self.diagnostics.is_empty() {
            return;
        }
        let _ = writeln!(out, "\nDiagnostics");
        for d in self.diagnostics() {
            let _ = writeln!(
                out,
                "  {} {:<5} {}",
                d.timestamp.with_timezone(&Local).format("%H:%M:%S"),
                d.level.tag(),
                d.message
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_feed::generator::{Generator, PulseGenerator, StatusGenerator};
    use nexus_feed::FetchError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn status_view() -> FeedView<StatusSnapshot> {
        let mut view = FeedView::default();
        view.apply(Ok(StatusGenerator::new().generate(&mut StdRng::seed_from_u64(5), Utc::now())));
        view
    }

    fn pulse_view() -> FeedView<PulseSnapshot> {
        let mut view = FeedView::default();
        view.apply(Ok(PulseGenerator::new().generate(&mut StdRng::seed_from_u64(5), Utc::now())));
        view
    }

    #[test]
    fn test_render_loading() {
        let dashboard = Dashboard::new();
        let text = dashboard.render(&FeedView::default(), &FeedView::default());
        assert!(text.contains("Loading system status..."));
        assert!(text.contains("Pulse: syncing..."));
    }

    #[test]
    fn test_render_snapshot() {
        let dashboard = Dashboard::new();
        let text = dashboard.render(&status_view(), &pulse_view());
        assert!(text.contains("ISDN Logistics Core"));
        assert!(text.contains("Auth Layer (SSO)"));
        assert!(text.contains("Active Intelligence Synchronized"));
        assert!(text.contains("integrity check PASSED"));
    }

    #[test]
    fn test_failure_after_data_keeps_snapshot_without_error_text() {
        let mut dashboard = Dashboard::new();
        let mut status = status_view();
        let mut pulse = pulse_view();
        dashboard.observe_status(&status);

        status.apply(Err(FetchError::Transport("connection refused".to_string())));
        pulse.apply(Err(FetchError::Status(502)));
        dashboard.observe_status(&status);

        let text = dashboard.render(&status, &pulse);
        assert!(text.contains("ISDN Logistics Core"));
        assert!(text.contains("Active Intelligence Synchronized"));
        assert!(!text.contains("connection refused"));
        assert!(!text.contains("fetch failed"));
        assert_eq!(dashboard.diagnostics().count(), 0);
    }

    #[test]
    fn test_first_fetch_failure_renders_neutral_sections() {
        let mut dashboard = Dashboard::new();
        let mut status: FeedView<StatusSnapshot> = FeedView::default();
        let mut pulse: FeedView<PulseSnapshot> = FeedView::default();

        status.apply(Err(FetchError::Transport("connection refused".to_string())));
        pulse.apply(Err(FetchError::Transport("connection refused".to_string())));
        dashboard.observe_status(&status);

        let text = dashboard.render(&status, &pulse);
        for hidden in ["unavailable", "fetch failed", "connection refused", "Diagnostics", "Loading", "syncing"] {
            assert!(!text.contains(hidden), "rendered {hidden:?}: {text}");
        }
    }

    #[test]
    fn test_status_transition_logged() {
        let mut dashboard = Dashboard::new();
        let mut view = status_view();
        dashboard.observe_status(&view);

        let mut snapshot = view.snapshot.clone().unwrap();
        let sales = snapshot.systems.iter_mut().find(|s| s.id == "sales-portal").unwrap();
        let next = if sales.status == SystemStatus::Online {
            SystemStatus::Maintenance
        } else {
            SystemStatus::Online
        };
        sales.status = next;
        view.apply(Ok(snapshot));
        dashboard.observe_status(&view);

        assert!(dashboard
            .diagnostics()
            .any(|d| d.message.starts_with("Sales Representative Portal:")));
    }

    #[test]
    fn test_diagnostics_are_capped() {
        let mut dashboard = Dashboard::new();
        for i in 0..(MAX_DIAGNOSTICS + 5) {
            dashboard.add_diagnostic(DiagnosticLevel::Info, format!("message {i}"));
        }
        assert_eq!(dashboard.diagnostics().count(), MAX_DIAGNOSTICS);
        assert_eq!(dashboard.diagnostics().next().unwrap().message, "message 5");
    }
}
