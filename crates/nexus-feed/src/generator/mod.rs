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

//! Snapshot generators for the simulated feeds.
//!
//! Every generator is stateless: each call draws fresh values from the
//! supplied random source. Callers pass both the RNG and the generation
//! instant, so tests can pin either one.

mod pulse;
mod status;

pub use pulse::{PulseGenerator, PULSE_STATUS_TEXT};
pub use status::{StatusGenerator, SYSTEM_IDS};

use chrono::{DateTime, Utc};
use rand::Rng;

/// Trait for snapshot generators.
///
/// Implement this trait to add another simulated feed.
pub trait Generator {
    /// The snapshot type produced by this generator.
    type Snapshot;

    /// Produce a fresh snapshot.
    ///
    /// Nothing is carried over from previous calls apart from the fixed
    /// constants baked into the generator.
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> Self::Snapshot;
}
