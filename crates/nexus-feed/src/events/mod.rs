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

//! In-process event bus for cross-component UI notifications.
//!
//! The chat session publishes here when a reply carries an action; any
//! display that cares (the project graph, a report panel) subscribes.

use log::debug;
use tokio::sync::broadcast;

/// Default channel capacity. Slow subscribers lose the oldest events.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Notifications broadcast to interested displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NexusEvent {
    /// Highlight a project node.
    HighlightProject { project_id: u32 },
    /// An architecture report was requested.
    ReportRequested,
    /// Safe mode was toggled.
    SafeModeToggled,
}

/// Publish/subscribe channel of [`NexusEvent`] values.
#[derive(Debug, Clone)]
pub struct EventBus {
    event_tx: broadcast::Sender<NexusEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity);
        Self { event_tx }
    }

    /// Publish an event to every current subscriber.
    ///
    /// Returns the number of subscribers reached; zero is not an error.
    pub fn publish(&self, event: NexusEvent) -> usize {
        debug!("Publishing {:?}", event);
        self.event_tx.send(event).unwrap_or(0)
    }

    /// Subscribe to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<NexusEvent> {
        self.event_tx.subscribe()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.event_tx.receiver_count()
    }
}
