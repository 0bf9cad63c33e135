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

//! Market pulse snapshot generator.

use chrono::{DateTime, Utc};
use rand::Rng;

use super::Generator;
use crate::model::{MarketTrend, PulseSnapshot};

/// Banner text attached to every pulse snapshot.
pub const PULSE_STATUS_TEXT: &str = "Active Intelligence Synchronized";

/// Generator for the market pulse feed.
///
/// Score, trend and commit density are independent draws; a bullish trend
/// says nothing about the score.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulseGenerator;

impl PulseGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Generator for PulseGenerator {
    type Snapshot = PulseSnapshot;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> PulseSnapshot {
        let pulse_score = rng.gen_range(0.5..=1.0);
        let market_trend = if rng.gen_bool(0.5) {
            MarketTrend::Bullish
        } else {
            MarketTrend::Bearish
        };
        let commit_density = rng.gen_range(10..=59);

        PulseSnapshot {
            pulse_score,
            market_trend,
            commit_density,
            timestamp: now,
            status: PULSE_STATUS_TEXT.to_string(),
        }
    }
}
