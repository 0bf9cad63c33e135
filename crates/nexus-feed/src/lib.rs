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

//! Feed library for the Digital Nexus status widgets.
//!
//! This library provides the simulated feeds behind the site's live panels
//! and the client-side machinery that consumes them. The layers can be used
//! independently or composed together:
//!
//! - **Model layer**: wire types for status and pulse snapshots
//! - **Generator layer**: stateless randomized snapshot generators with an
//!   injectable random source
//! - **Poller layer**: interval polling with cancellation and stale-data
//!   retention on failure
//! - **Chat layer**: keyword-matched responder and the client session that
//!   turns reply actions into events
//! - **Contact layer**: field-level validation of contact submissions
//!
//! # Generating a Snapshot
//!
//! ```
//! use chrono::Utc;
//! use nexus_feed::generator::{Generator, StatusGenerator};
//!
//! let snapshot = StatusGenerator::new().generate(&mut rand::thread_rng(), Utc::now());
//! assert_eq!(snapshot.systems.len(), 4);
//! ```
//!
//! # Polling a Feed
//!
//! ```no_run
//! use chrono::Utc;
//! use nexus_feed::generator::{Generator, PulseGenerator};
//! use nexus_feed::model::PulseSnapshot;
//! use nexus_feed::poller::{Fetch, FetchError, Poller, PollerConfig};
//!
//! struct InProcess;
//!
//! impl Fetch for InProcess {
//!     type Output = PulseSnapshot;
//!
//!     async fn fetch(&self) -> Result<PulseSnapshot, FetchError> {
//!         Ok(PulseGenerator::new().generate(&mut rand::thread_rng(), Utc::now()))
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut poller = Poller::spawn(InProcess, PollerConfig::pulse());
//!     while poller.changed().await {
//!         if let Some(pulse) = poller.view().snapshot {
//!             println!("pulse {:.2} ({:?})", pulse.pulse_score, pulse.market_trend);
//!         }
//!     }
//! }
//! ```

pub mod chat;
pub mod contact;
pub mod events;
pub mod generator;
pub mod model;
pub mod poller;

pub use chat::{respond, ChatAction, ChatMessage, ChatReply, ChatRequest, ChatSession, ChatTransport, Role};
pub use contact::{ContactForm, ProjectType, ValidationErrors};
pub use events::{EventBus, NexusEvent};
pub use generator::{Generator, PulseGenerator, StatusGenerator};
pub use model::{LogEntry, LogKind, MarketTrend, PulseSnapshot, StatusSnapshot, SystemRecord, SystemStatus};
pub use poller::{FeedView, Fetch, FetchError, Poller, PollerConfig};
